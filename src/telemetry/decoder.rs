use chrono::{DateTime, Utc};

use super::types::{Decoded, TelemetryEvent};

const QUIT_LINES: [&str; 2] = ["QUIT", "SAT,QUIT"];

/// Strips surrounding whitespace and NUL padding.
fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| *c != '\0').collect::<String>().trim().to_string()
}

/// Decodes `SAT,FAOS,NAME,AZIMUTH,TIMETOGO` or a quit line.
///
/// Never fails: anything unexpected is [`Decoded::Ignored`].
pub fn decode(raw: &str, received_at: DateTime<Utc>) -> Decoded {
    let line = normalize(raw);

    if QUIT_LINES.iter().any(|q| line.eq_ignore_ascii_case(q)) {
        return Decoded::Quit;
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 5 || fields[0] != "SAT" || fields[1] != "FAOS" {
        return Decoded::Ignored;
    }

    let Ok(azimuth_deg) = fields[3].parse::<f64>() else {
        return Decoded::Ignored;
    };
    let Some(time_to_go_seconds) = parse_time_to_go(fields[4]) else {
        return Decoded::Ignored;
    };

    Decoded::Telemetry(TelemetryEvent {
        satellite_id: fields[2].to_string(),
        azimuth_deg,
        time_to_go_seconds,
        received_at,
    })
}

/// Float parse, then truncation toward zero.
fn parse_time_to_go(field: &str) -> Option<i64> {
    let value = field.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc() as i64)
}
