use std::sync::Mutex;

use super::{Notifier, NotifyError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Speak(String),
    Popup {
        title: String,
        message: String,
        timeout_seconds: u64,
    },
}

/// Test double that remembers every call and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub calls: Mutex<Vec<Call>>,
    pub fail_voice: bool,
    pub fail_popup: bool,
}

impl RecordingNotifier {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn failure(program: &str) -> NotifyError {
        NotifyError::Exit {
            program: program.to_string(),
            code: 1,
            stderr: "forced".to_string(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn speak(&self, text: &str) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(Call::Speak(text.to_string()));
        if self.fail_voice {
            return Err(Self::failure("voice"));
        }
        Ok(())
    }

    fn show_popup(
        &self,
        title: &str,
        message: &str,
        timeout_seconds: u64,
    ) -> Result<(), NotifyError> {
        self.calls.lock().unwrap().push(Call::Popup {
            title: title.to_string(),
            message: message.to_string(),
            timeout_seconds,
        });
        if self.fail_popup {
            return Err(Self::failure("popup"));
        }
        Ok(())
    }
}
