mod message;

pub use message::Alert;
