use std::sync::Arc;
use tokio::task::JoinHandle;

use super::Notifier;
use crate::alert::Alert;
use crate::config::NotifyConfig;

/// Which renderers are enabled.
#[derive(Debug, Clone, Copy)]
pub struct Channels {
    pub voice: bool,
    pub popup: bool,
    pub popup_timeout_seconds: u64,
}

impl From<&NotifyConfig> for Channels {
    fn from(config: &NotifyConfig) -> Self {
        Self {
            voice: config.enable_voice,
            popup: config.enable_popup,
            popup_timeout_seconds: config.popup_timeout_seconds,
        }
    }
}

/// Voice first, then popup. Failures are logged and swallowed.
pub fn deliver(notifier: &dyn Notifier, alert: &Alert, channels: Channels) {
    if channels.voice {
        if let Err(e) = notifier.speak(&alert.voice_text) {
            log::warn!("Voice failed: {}", e);
        }
    }
    if channels.popup {
        if let Err(e) = notifier.show_popup(
            &alert.title,
            &alert.popup_message,
            channels.popup_timeout_seconds,
        ) {
            log::warn!("Popup failed: {}", e);
        }
    }
}

/// Runs [`deliver`] on the blocking pool. Callers normally drop the handle.
pub fn dispatch(notifier: Arc<dyn Notifier>, alert: Alert, channels: Channels) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || deliver(notifier.as_ref(), &alert, channels))
}
