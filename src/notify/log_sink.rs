use super::{Notifier, NotifyError};

/// Logs alerts instead of rendering them.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn speak(&self, text: &str) -> Result<(), NotifyError> {
        log::info!("[voice] {}", text);
        Ok(())
    }

    fn show_popup(
        &self,
        title: &str,
        message: &str,
        timeout_seconds: u64,
    ) -> Result<(), NotifyError> {
        log::info!("[popup {}s] {}: {}", timeout_seconds, title, message);
        Ok(())
    }
}
