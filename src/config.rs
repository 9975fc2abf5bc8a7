use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid duration for {field}: {message}")]
    Duration { field: &'static str, message: String },
    #[error("invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listener: ListenerConfig,
    pub tracking: TrackingConfig,
    pub notify: NotifyConfig,
    pub supervisor: SupervisorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub bind: String,
    /// How long a receive may block before the stop flag is re-checked.
    pub poll_interval: String,
    pub max_datagram_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:9932".to_string(),
            poll_interval: "1s".to_string(),
            max_datagram_bytes: 2048,
        }
    }
}

impl ListenerConfig {
    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        parse_duration("listener.poll_interval", &self.poll_interval)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub alert_threshold_seconds: i64,
    pub pass_jump_threshold_seconds: i64,
    pub tolerance_seconds: i64,
    pub resync_gap_seconds: i64,
    pub required_good: u32,
    pub speak_once_per_pass: bool,
    /// Empty means every satellite is accepted.
    pub allowed_sats: HashSet<String>,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            alert_threshold_seconds: 60,
            pass_jump_threshold_seconds: 120,
            tolerance_seconds: 15,
            resync_gap_seconds: 300,
            required_good: 2,
            speak_once_per_pass: true,
            allowed_sats: HashSet::new(),
        }
    }
}

impl TrackingConfig {
    pub fn is_allowed(&self, satellite: &str) -> bool {
        self.allowed_sats.is_empty() || self.allowed_sats.contains(satellite)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    pub enable_voice: bool,
    pub enable_popup: bool,
    pub popup_timeout_seconds: u64,
    /// argv template; `{text}` is replaced with the spoken sentence.
    pub voice_command: Option<Vec<String>>,
    /// argv template; `{title}`, `{message}`, `{timeout}` and `{timeout_ms}`
    /// are substituted.
    pub popup_command: Option<Vec<String>>,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enable_voice: true,
            enable_popup: true,
            popup_timeout_seconds: 10,
            voice_command: None,
            popup_command: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    pub restart_on_error: bool,
    pub restart_delay: String,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            restart_on_error: true,
            restart_delay: "2s".to_string(),
        }
    }
}

impl SupervisorConfig {
    pub fn restart_delay(&self) -> Result<Duration, ConfigError> {
        parse_duration("supervisor.restart_delay", &self.restart_delay)
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null rather than an empty map.
        if yaml.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if given, otherwise returns the defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Config::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, message: &str| ConfigError::Invalid {
            field,
            message: message.to_string(),
        };

        let t = &self.tracking;
        if t.required_good == 0 {
            return Err(invalid("tracking.required_good", "must be at least 1"));
        }
        for (field, value) in [
            ("tracking.alert_threshold_seconds", t.alert_threshold_seconds),
            (
                "tracking.pass_jump_threshold_seconds",
                t.pass_jump_threshold_seconds,
            ),
            ("tracking.tolerance_seconds", t.tolerance_seconds),
            ("tracking.resync_gap_seconds", t.resync_gap_seconds),
        ] {
            if value < 0 {
                return Err(invalid(field, "must not be negative"));
            }
        }

        if self.listener.poll_interval()?.is_zero() {
            return Err(invalid("listener.poll_interval", "must be non-zero"));
        }
        if self.listener.max_datagram_bytes == 0 {
            return Err(invalid("listener.max_datagram_bytes", "must be non-zero"));
        }
        self.supervisor.restart_delay()?;

        if matches!(&self.notify.voice_command, Some(argv) if argv.is_empty()) {
            return Err(invalid("notify.voice_command", "must not be empty"));
        }
        if matches!(&self.notify.popup_command, Some(argv) if argv.is_empty()) {
            return Err(invalid("notify.popup_command", "must not be empty"));
        }

        Ok(())
    }
}

fn parse_duration(field: &'static str, s: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(s.trim()).map_err(|e| ConfigError::Duration {
        field,
        message: e.to_string(),
    })
}
