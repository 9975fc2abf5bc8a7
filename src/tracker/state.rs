use chrono::{DateTime, Utc};
use std::fmt;

/// Per-satellite snapshot. Updates produce a new value which replaces the
/// stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SatelliteState {
    pub last_time_to_go: Option<i64>,
    pub last_seen_at: DateTime<Utc>,
    /// Consecutive samples whose TTG drop matched wall-clock time, capped
    /// at `required_good`.
    pub consecutive_good_count: u32,
    pub has_alerted: bool,
}

impl Default for SatelliteState {
    fn default() -> Self {
        Self {
            last_time_to_go: None,
            last_seen_at: DateTime::UNIX_EPOCH,
            consecutive_good_count: 0,
            has_alerted: false,
        }
    }
}

impl SatelliteState {
    pub fn is_synced(&self, required_good: u32) -> bool {
        self.consecutive_good_count >= required_good
    }

    pub fn sync_status(&self, required_good: u32) -> SyncStatus {
        if self.is_synced(required_good) {
            SyncStatus::Synced
        } else {
            SyncStatus::Syncing {
                good: self.consecutive_good_count,
                required: required_good,
            }
        }
    }
}

/// Log-friendly view of the real-time judgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    Syncing { good: u32, required: u32 },
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Synced => write!(f, "OK"),
            SyncStatus::Syncing { good, required } => write!(f, "SYNC({good}/{required})"),
        }
    }
}
