use chrono::{DateTime, Utc};
use std::net::SocketAddr;

use crate::alert::Alert;
use crate::config::TrackingConfig;
use crate::telemetry::{self, Decoded, TelemetryEvent};
use crate::tracker::{Gate, SatelliteState, Thresholds, Tracker};

/// What one line did to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Quit,
    Ignored,
    /// Not in the allow-list; no state was touched.
    Filtered { satellite: String },
    Tracked {
        event: TelemetryEvent,
        state: SatelliteState,
        alert: Option<Alert>,
    },
}

/// Decoder -> tracker -> gate for one listening session. Single writer:
/// lines must be fed one at a time.
pub struct Pipeline {
    tracking: TrackingConfig,
    tracker: Tracker,
    gate: Gate,
}

impl Pipeline {
    pub fn new(tracking: &TrackingConfig) -> Self {
        Self {
            tracking: tracking.clone(),
            tracker: Tracker::new(Thresholds::from(tracking)),
            gate: Gate::from(tracking),
        }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn handle_line(&mut self, raw: &str, source: SocketAddr, now: DateTime<Utc>) -> Step {
        let event = match telemetry::decode(raw, now) {
            Decoded::Quit => return Step::Quit,
            Decoded::Ignored => {
                log::debug!("Ignoring line from {}: {:?}", source, raw);
                return Step::Ignored;
            }
            Decoded::Telemetry(event) => event,
        };

        if !self.tracking.is_allowed(&event.satellite_id) {
            log::debug!("Skipping {}: not in allowed_sats", event.satellite_id);
            return Step::Filtered {
                satellite: event.satellite_id,
            };
        }

        let ttg = event.time_to_go_seconds;
        let mut state = self
            .tracker
            .on_event(&event.satellite_id, ttg, event.received_at);

        log::info!(
            "FAOS {}: ttg={} az={:.1} from {} realtime={}",
            event.satellite_id,
            ttg,
            event.azimuth_deg,
            source.ip(),
            state.sync_status(self.tracker.required_good())
        );

        let alert = if self.gate.should_alert(&state, ttg) {
            state = self.gate.mark_alerted(state);
            self.tracker.record(&event.satellite_id, state);
            Some(Alert::rising(&event.satellite_id, ttg))
        } else {
            None
        };

        Step::Tracked {
            event,
            state,
            alert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn source() -> SocketAddr {
        "192.0.2.7:5000".parse().unwrap()
    }

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn feed(pipeline: &mut Pipeline, line: &str, offset: i64) -> Step {
        pipeline.handle_line(line, source(), t0() + Duration::seconds(offset))
    }

    fn alert_of(step: &Step) -> Option<&Alert> {
        match step {
            Step::Tracked { alert, .. } => alert.as_ref(),
            _ => None,
        }
    }

    #[test]
    fn quit_and_noise() {
        let mut pipeline = Pipeline::new(&TrackingConfig::default());
        assert_eq!(feed(&mut pipeline, "Sat,Quit", 0), Step::Quit);
        assert_eq!(feed(&mut pipeline, "hello", 0), Step::Ignored);
        assert_eq!(pipeline.tracker().tracked(), 0);
    }

    #[test]
    fn alerts_once_per_pass() {
        let mut pipeline = Pipeline::new(&TrackingConfig::default());

        let first = feed(&mut pipeline, "SAT,FAOS,RS-44,151.1,90", 0);
        assert!(alert_of(&first).is_none());

        let second = feed(&mut pipeline, "SAT,FAOS,RS-44,151.1,60", 30);
        let alert = alert_of(&second).expect("alert");
        assert_eq!(alert.popup_message, "RS-44 Rising in 1:00");
        assert!(pipeline.tracker().state("RS-44").has_alerted);

        let third = feed(&mut pipeline, "SAT,FAOS,RS-44,151.1,30", 60);
        assert!(alert_of(&third).is_none());
    }

    #[test]
    fn new_pass_rearms() {
        let mut pipeline = Pipeline::new(&TrackingConfig::default());
        feed(&mut pipeline, "SAT,FAOS,ISS,10,50", 0);
        assert!(alert_of(&feed(&mut pipeline, "SAT,FAOS,ISS,10,20", 30)).is_some());

        // Next pass, ~90 minutes away.
        feed(&mut pipeline, "SAT,FAOS,ISS,10,5400", 40);
        let mut fired = 0;
        let mut ttg = 5400;
        let mut at = 40;
        while ttg > 0 {
            ttg -= 60;
            at += 60;
            if alert_of(&feed(&mut pipeline, &format!("SAT,FAOS,ISS,10,{ttg}"), at)).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn burst_after_sleep_stays_quiet() {
        let mut pipeline = Pipeline::new(&TrackingConfig::default());
        feed(&mut pipeline, "SAT,FAOS,ISS,10,3000", 0);
        feed(&mut pipeline, "SAT,FAOS,ISS,10,2940", 60);

        // Host wakes an hour later; queued samples arrive together.
        for ttg in [2880, 2820, 120, 60, 30, 10] {
            let step = feed(&mut pipeline, &format!("SAT,FAOS,ISS,10,{ttg}"), 3660);
            assert!(alert_of(&step).is_none(), "ttg {ttg}");
        }
    }

    #[test]
    fn quit_with_stray_bytes() {
        use crate::listener::transport::decode_text;

        let mut pipeline = Pipeline::new(&TrackingConfig::default());
        let line = decode_text(b"SAT,QUIT\xff");
        assert_eq!(feed(&mut pipeline, &line, 0), Step::Quit);
    }

    #[test]
    fn huge_time_to_go_does_not_panic() {
        let mut pipeline = Pipeline::new(&TrackingConfig::default());
        feed(&mut pipeline, "SAT,FAOS,X,0,1e30", 0);
        let step = feed(&mut pipeline, "SAT,FAOS,X,0,1e30", 1);
        assert!(alert_of(&step).is_none());
        assert_eq!(
            pipeline.tracker().state("X").last_time_to_go,
            Some(i64::MAX)
        );
    }

    #[test]
    fn allow_list_skips_other_satellites() {
        let tracking = TrackingConfig {
            allowed_sats: ["ISS".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let mut pipeline = Pipeline::new(&tracking);
        let step = feed(&mut pipeline, "SAT,FAOS,RS-44,151.1,55", 0);
        assert_eq!(
            step,
            Step::Filtered {
                satellite: "RS-44".to_string()
            }
        );
        assert_eq!(pipeline.tracker().tracked(), 0);
    }
}
