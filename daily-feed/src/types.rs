use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Calendar components of a structured feed timestamp.
///
/// Interpreted as UTC civil time, not converted through an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CivilTime {
    pub fn from_utc(dt: &DateTime<Utc>) -> Self {
        use chrono::{Datelike, Timelike};

        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }

    /// Returns `None` when the components don't form a valid date/time.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?
            .and_hms_opt(self.hour, self.minute, self.second)
            .map(|naive| naive.and_utc())
    }
}

/// One feed item as handed over by the parsing collaborator.
///
/// Every field is optional; an empty string is treated the same as a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub id: Option<String>,
    pub guid: Option<String>,
    pub link: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub published_parsed: Option<CivilTime>,
    pub updated_parsed: Option<CivilTime>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub pub_date: Option<String>,
    pub date: Option<String>,
}

/// Non-empty view of an optional string field.
pub(crate) fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub identity: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "daily-feed/0.1".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Result of processing one feed successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedReport {
    pub key: String,
    pub entries: usize,
    pub novel: usize,
    pub output_path: std::path::PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("XML render error: {0}")]
    Render(String),

    #[error("General error: {0}")]
    General(String),
}

impl DigestError {
    /// True for errors raised while retrieving the feed bytes.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, DigestError::Http(_) | DigestError::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn civil_time_round_trips_through_utc() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 5).unwrap();
        assert_eq!(CivilTime::from_utc(&dt).to_utc(), Some(dt));
    }

    #[test]
    fn invalid_civil_time_is_absent() {
        let bad = CivilTime {
            year: 2024,
            month: 2,
            day: 30,
            hour: 0,
            minute: 0,
            second: 0,
        };
        assert_eq!(bad.to_utc(), None);
    }

    #[test]
    fn empty_strings_are_not_present() {
        assert_eq!(present(&Some(String::new())), None);
        assert_eq!(present(&Some("x".into())), Some("x"));
        assert_eq!(present(&None), None);
    }
}
