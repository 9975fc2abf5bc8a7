use std::sync::Arc;
use tokio::sync::watch;

/// Why the process was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StopReason {
    /// `QUIT` / `SAT,QUIT` datagram.
    RemoteQuit,
    /// Console quit key.
    Hotkey,
    /// Ctrl+C.
    Interrupt,
    /// Listener failed and restarts are disabled.
    Fatal,
}

/// Shared stop flag. Any task or thread may set it; async waiters are woken
/// as soon as it is set. Only the first reason is kept.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<Option<StopReason>>>,
}

impl Default for StopSignal {
    fn default() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self, reason: StopReason) {
        self.tx.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = Some(reason);
            true
        });
    }

    pub fn is_stopped(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn reason(&self) -> Option<StopReason> {
        *self.tx.borrow()
    }

    /// Resolves once the flag is set; immediately if it already is.
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(Option::is_some).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn first_reason_wins() {
        let stop = StopSignal::new();
        assert!(!stop.is_stopped());
        assert_eq!(stop.reason(), None);

        let other = stop.clone();
        other.stop(StopReason::RemoteQuit);
        stop.stop(StopReason::Hotkey);

        assert!(stop.is_stopped());
        assert_eq!(stop.reason(), Some(StopReason::RemoteQuit));
    }

    #[test]
    fn reason_display() {
        assert_eq!(StopReason::RemoteQuit.to_string(), "remote_quit");
        assert_eq!(StopReason::Fatal.to_string(), "fatal");
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_wakes_without_polling() {
        let stop = StopSignal::new();
        let setter = stop.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            setter.stop(StopReason::Interrupt);
        });

        let started = tokio::time::Instant::now();
        tokio::time::timeout(Duration::from_secs(10), stop.stopped())
            .await
            .expect("woken by stop");
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(stop.reason(), Some(StopReason::Interrupt));
    }

    #[tokio::test]
    async fn stopped_is_immediate_when_already_set() {
        let stop = StopSignal::new();
        stop.stop(StopReason::Hotkey);
        tokio::time::timeout(Duration::from_millis(100), stop.stopped())
            .await
            .expect("already stopped");
    }

    #[test]
    fn stop_from_plain_thread() {
        let stop = StopSignal::new();
        let setter = stop.clone();
        std::thread::spawn(move || setter.stop(StopReason::Hotkey))
            .join()
            .unwrap();
        assert_eq!(stop.reason(), Some(StopReason::Hotkey));
    }
}
