use super::state::SatelliteState;
use crate::config::TrackingConfig;

/// Decides whether a tracked sample should raise the rising alert.
#[derive(Debug, Clone, Copy)]
pub struct Gate {
    pub alert_threshold_seconds: i64,
    pub required_good: u32,
    pub speak_once_per_pass: bool,
}

impl From<&TrackingConfig> for Gate {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            alert_threshold_seconds: config.alert_threshold_seconds,
            required_good: config.required_good,
            speak_once_per_pass: config.speak_once_per_pass,
        }
    }
}

impl Gate {
    pub fn should_alert(&self, state: &SatelliteState, time_to_go: i64) -> bool {
        state.is_synced(self.required_good)
            && time_to_go <= self.alert_threshold_seconds
            && (!self.speak_once_per_pass || !state.has_alerted)
    }

    /// Must be applied (and stored) right after a positive
    /// [`should_alert`](Self::should_alert), before the next event.
    pub fn mark_alerted(&self, state: SatelliteState) -> SatelliteState {
        SatelliteState {
            has_alerted: true,
            ..state
        }
    }
}
