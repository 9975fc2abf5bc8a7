mod decoder;
mod types;

pub use decoder::decode;
pub use types::{Decoded, TelemetryEvent};
