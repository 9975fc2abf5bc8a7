mod error;
mod pipeline;
mod supervisor;
mod transport;

pub use supervisor::Supervisor;
