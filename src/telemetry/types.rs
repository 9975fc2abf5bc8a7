use chrono::{DateTime, Utc};
use serde::Serialize;

/// One `SAT,FAOS,...` sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    pub satellite_id: String,
    /// Parsed for completeness; never spoken.
    pub azimuth_deg: f64,
    pub time_to_go_seconds: i64,
    pub received_at: DateTime<Utc>,
}

/// Result of decoding one raw line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoded {
    Telemetry(TelemetryEvent),
    Quit,
    Ignored,
}
