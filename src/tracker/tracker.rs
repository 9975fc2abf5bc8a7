use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::state::SatelliteState;
use crate::config::TrackingConfig;

/// Thresholds used when folding a sample into a [`SatelliteState`].
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub pass_jump_seconds: i64,
    pub tolerance_seconds: i64,
    pub resync_gap_seconds: i64,
    pub required_good: u32,
}

impl From<&TrackingConfig> for Thresholds {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            pass_jump_seconds: config.pass_jump_threshold_seconds,
            tolerance_seconds: config.tolerance_seconds,
            resync_gap_seconds: config.resync_gap_seconds,
            required_good: config.required_good,
        }
    }
}

/// Owns per-satellite state. Only the pipeline task writes to it.
pub struct Tracker {
    thresholds: Thresholds,
    states: HashMap<String, SatelliteState>,
}

impl Tracker {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            states: HashMap::new(),
        }
    }

    pub fn required_good(&self) -> u32 {
        self.thresholds.required_good
    }

    /// Stored state, or the unseen default.
    pub fn state(&self, satellite_id: &str) -> SatelliteState {
        self.states.get(satellite_id).copied().unwrap_or_default()
    }

    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// Folds one sample in and returns the stored snapshot.
    pub fn on_event(
        &mut self,
        satellite_id: &str,
        time_to_go: i64,
        now: DateTime<Utc>,
    ) -> SatelliteState {
        let previous = self.state(satellite_id);
        if is_pass_boundary(&previous, time_to_go, &self.thresholds) {
            log::info!(
                "{}: new pass (ttg jumped to {}), re-armed",
                satellite_id,
                time_to_go
            );
        }
        let next = advance(previous, time_to_go, now, &self.thresholds);

        self.states.insert(satellite_id.to_string(), next);
        next
    }

    /// Replaces the stored snapshot, e.g. after the gate marks an alert.
    pub fn record(&mut self, satellite_id: &str, state: SatelliteState) {
        self.states.insert(satellite_id.to_string(), state);
    }
}

/// Pure state transition for one sample.
pub fn advance(
    state: SatelliteState,
    time_to_go: i64,
    now: DateTime<Utc>,
    thresholds: &Thresholds,
) -> SatelliteState {
    let mut st = if is_pass_boundary(&state, time_to_go, thresholds) {
        SatelliteState::default()
    } else {
        state
    };

    // Must run before last_time_to_go / last_seen_at are overwritten.
    st.consecutive_good_count = match st.last_time_to_go {
        None => 1,
        Some(last) => {
            let elapsed = seconds_between(st.last_seen_at, now);
            if elapsed >= thresholds.resync_gap_seconds as f64 {
                1
            } else {
                let observed_decrease = last.saturating_sub(time_to_go) as f64;
                let deviation = (observed_decrease - elapsed).abs();
                if deviation <= thresholds.tolerance_seconds as f64 {
                    (st.consecutive_good_count + 1).min(thresholds.required_good)
                } else {
                    1
                }
            }
        }
    };

    st.last_time_to_go = Some(time_to_go);
    st.last_seen_at = now;
    st
}

/// TTG only counts down within a pass; a large jump up starts a new one.
fn is_pass_boundary(state: &SatelliteState, time_to_go: i64, thresholds: &Thresholds) -> bool {
    matches!(
        state.last_time_to_go,
        Some(last) if time_to_go > last.saturating_add(thresholds.pass_jump_seconds)
    )
}

fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}
