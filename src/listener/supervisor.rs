use std::sync::Arc;

use super::error::ListenerError;
use super::pipeline::{Pipeline, Step};
use super::transport::UdpTransport;
use crate::config::Config;
use crate::notify::{dispatch, Channels, Notifier};
use crate::stop::{StopReason, StopSignal};

/// One listening session: bind, then feed datagrams through a fresh
/// pipeline until the stop flag is set. Returns `Err` on transport failure.
pub async fn run_session(
    config: &Config,
    notifier: Arc<dyn Notifier>,
    stop: &StopSignal,
) -> Result<(), ListenerError> {
    let poll = config.listener.poll_interval()?;
    let channels = Channels::from(&config.notify);
    let mut transport =
        UdpTransport::bind(&config.listener.bind, config.listener.max_datagram_bytes).await?;
    let mut pipeline = Pipeline::new(&config.tracking);

    log::info!("sat-rise-alert v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Listening on UDP {}", transport.local_addr());
    log::info!("Quit: q + Enter (console), Ctrl+C, or UDP 'SAT,QUIT'");

    loop {
        let received = tokio::select! {
            biased;
            _ = stop.stopped() => break,
            received = transport.recv(poll) => received?,
        };
        let Some(datagram) = received else {
            continue;
        };

        match pipeline.handle_line(&datagram.text, datagram.source, datagram.received_at) {
            Step::Quit => {
                log::info!(
                    "Remote quit received from {}. Shutting down...",
                    datagram.source.ip()
                );
                stop.stop(StopReason::RemoteQuit);
            }
            Step::Tracked {
                alert: Some(alert), ..
            } => {
                log::info!("ALERT {}", alert.popup_message);
                // Fire-and-forget; the task never touches pipeline state.
                drop(dispatch(notifier.clone(), alert, channels));
            }
            Step::Tracked { alert: None, .. } | Step::Filtered { .. } | Step::Ignored => {}
        }
    }

    log::debug!(
        "Session ended with {} satellite(s) tracked",
        pipeline.tracker().tracked()
    );
    Ok(())
}

/// Restarts the listening session after failures. Tracker state is not
/// carried across restarts.
pub struct Supervisor {
    config: Config,
    notifier: Arc<dyn Notifier>,
    stop: StopSignal,
}

impl Supervisor {
    pub fn new(config: Config, notifier: Arc<dyn Notifier>, stop: StopSignal) -> Self {
        Self {
            config,
            notifier,
            stop,
        }
    }

    /// Returns how many sessions ended in error.
    pub async fn run(&self) -> usize {
        let mut failures = 0;

        while !self.stop.is_stopped() {
            let Err(e) = run_session(&self.config, self.notifier.clone(), &self.stop).await else {
                continue;
            };
            failures += 1;
            log::error!("Listener crashed: {}", e);

            if !self.config.supervisor.restart_on_error {
                self.stop.stop(StopReason::Fatal);
                break;
            }

            let delay = match self.config.supervisor.restart_delay() {
                Ok(delay) => delay,
                Err(e) => {
                    log::error!("{}", e);
                    self.stop.stop(StopReason::Fatal);
                    break;
                }
            };
            log::info!("Restarting in {}...", humantime::format_duration(delay));
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.stop.stopped() => {}
            }
        }

        failures
    }
}
