use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};

/// A point in time recovered from free-form text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LenientTime {
    /// The text carried an explicit UTC offset.
    Aware(DateTime<FixedOffset>),
    /// No zone information was present.
    Naive(NaiveDateTime),
}

impl LenientTime {
    /// Naive times are taken to be UTC.
    pub fn to_utc(self) -> DateTime<Utc> {
        match self {
            LenientTime::Aware(dt) => dt.with_timezone(&Utc),
            LenientTime::Naive(naive) => naive.and_utc(),
        }
    }
}

/// Best-effort string to time conversion.
pub trait DateParser: Send + Sync {
    fn parse(&self, text: &str) -> Option<LenientTime>;

    fn parse_utc(&self, text: &str) -> Option<DateTime<Utc>> {
        self.parse(text).map(LenientTime::to_utc)
    }
}

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M%:z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M:%S %z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y", "%B %d, %Y", "%b %d, %Y"];

/// Accepts RFC 3339, RFC 2822 and a handful of layouts common in feeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientDateParser;

impl DateParser for LenientDateParser {
    fn parse(&self, text: &str) -> Option<LenientTime> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(LenientTime::Aware(dt));
        }
        if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
            return Some(LenientTime::Aware(dt));
        }
        for fmt in AWARE_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
                return Some(LenientTime::Aware(dt));
            }
        }

        // Trailing "Z" / "UTC" / "GMT" without a numeric offset.
        let (body, utc_suffix) = strip_utc_suffix(text);
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(body, fmt) {
                return Some(if utc_suffix {
                    LenientTime::Aware(naive.and_utc().fixed_offset())
                } else {
                    LenientTime::Naive(naive)
                });
            }
        }
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(body, fmt) {
                return date.and_hms_opt(0, 0, 0).map(LenientTime::Naive);
            }
        }

        None
    }
}

fn strip_utc_suffix(text: &str) -> (&str, bool) {
    for suffix in [" UTC", " GMT", "Z"] {
        if let Some(body) = text.strip_suffix(suffix) {
            return (body.trim_end(), true);
        }
    }
    (text, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(s: &str) -> Option<DateTime<Utc>> {
        LenientDateParser.parse_utc(s)
    }

    #[test]
    fn parses_rfc3339_and_converts_offsets() {
        assert_eq!(
            utc("2024-01-01T02:00:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            utc("2024-01-01T00:00:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn parses_rfc2822_pub_dates() {
        assert_eq!(
            utc("Mon, 01 Jan 2024 10:00:00 GMT"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(
            utc("Mon, 01 Jan 2024 10:00:00 +0100"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn naive_times_stay_naive() {
        let parsed = LenientDateParser.parse("2024-01-01 08:30:00").unwrap();
        assert!(matches!(parsed, LenientTime::Naive(_)));
        assert_eq!(
            parsed.to_utc(),
            Utc.with_ymd_and_hms(2024, 1, 1, 8, 30, 0).unwrap()
        );
    }

    #[test]
    fn date_only_resolves_to_midnight() {
        assert_eq!(
            utc("2024-03-05"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(
            utc("March 5, 2024"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn explicit_utc_suffix_is_aware() {
        let parsed = LenientDateParser.parse("2024-01-01 08:30:00 UTC").unwrap();
        assert!(matches!(parsed, LenientTime::Aware(_)));
    }

    #[test]
    fn garbage_is_absent() {
        assert_eq!(LenientDateParser.parse("not a date"), None);
        assert_eq!(LenientDateParser.parse("   "), None);
    }
}
