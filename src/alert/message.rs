/// Rendered texts for one rising alert. Azimuth is never included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub satellite: String,
    pub time_to_go_seconds: i64,
    pub title: String,
    pub popup_message: String,
    pub voice_text: String,
}

impl Alert {
    pub fn rising(satellite: &str, time_to_go_seconds: i64) -> Self {
        Self {
            satellite: satellite.to_string(),
            time_to_go_seconds,
            title: format!("{} Rising", satellite),
            popup_message: format!(
                "{} Rising in {}",
                satellite,
                format_mmss(time_to_go_seconds)
            ),
            voice_text: format!("{} rising in {} seconds.", satellite, time_to_go_seconds),
        }
    }
}

/// `M:SS`; negative input clamps to zero.
pub fn format_mmss(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
