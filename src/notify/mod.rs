mod command;
mod dispatch;
mod error;
mod log_sink;
#[cfg(test)]
pub mod recording;

pub use command::CommandNotifier;
pub use dispatch::{dispatch, Channels};
pub use error::NotifyError;
pub use log_sink::LogNotifier;

/// Renders alerts to the operator.
pub trait Notifier: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), NotifyError>;
    fn show_popup(&self, title: &str, message: &str, timeout_seconds: u64)
        -> Result<(), NotifyError>;
}
