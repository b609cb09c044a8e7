use crate::dates::DateParser;
use crate::seen::SeenRecord;
use crate::types::{present, NormalizedEntry, RawEntry};
use chrono::{DateTime, Duration, SecondsFormat, Utc};

pub const DEFAULT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    New,
    NotNew,
}

/// The row of the decision table an entry landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    UnseenUndated,
    UnseenRecent,
    UnseenStale,
    SeenUndated,
    SeenStale,
    Republished,
    SeenNotNewer,
    StoredUnparseable,
}

impl Reason {
    pub fn verdict(self) -> Verdict {
        match self {
            Reason::UnseenUndated | Reason::UnseenRecent | Reason::Republished => Verdict::New,
            _ => Verdict::NotNew,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub reason: Reason,
    /// Value to store for the entry's identity, whatever the verdict.
    pub stamp: String,
}

impl Classification {
    pub fn verdict(&self) -> Verdict {
        self.reason.verdict()
    }

    pub fn is_new(&self) -> bool {
        self.verdict() == Verdict::New
    }
}

/// ISO-8601 form used both for persisted stamps and output dates.
pub fn iso8601(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Judges entries against the seen-state loaded at the start of the run.
pub struct NoveltyClassifier<'a> {
    seen: &'a SeenRecord,
    now: DateTime<Utc>,
    cutoff: DateTime<Utc>,
    dates: &'a dyn DateParser,
}

impl<'a> NoveltyClassifier<'a> {
    pub fn new(
        seen: &'a SeenRecord,
        now: DateTime<Utc>,
        window: Duration,
        dates: &'a dyn DateParser,
    ) -> Self {
        Self {
            seen,
            now,
            cutoff: now - window,
            dates,
        }
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn decide(&self, entry: &NormalizedEntry) -> Reason {
        let Some(stored) = self.seen.get(&entry.identity) else {
            return match entry.timestamp {
                None => Reason::UnseenUndated,
                Some(ts) if ts >= self.cutoff => Reason::UnseenRecent,
                Some(_) => Reason::UnseenStale,
            };
        };

        let Some(stored) = self.dates.parse_utc(stored) else {
            return Reason::StoredUnparseable;
        };
        match entry.timestamp {
            None => Reason::SeenUndated,
            Some(ts) if ts < self.cutoff => Reason::SeenStale,
            Some(ts) if ts > stored => Reason::Republished,
            Some(_) => Reason::SeenNotNewer,
        }
    }

    /// Stamp to remember: the resolved timestamp, else a raw date string, else `now`.
    pub fn stamp_for(&self, entry: &NormalizedEntry, raw: &RawEntry) -> String {
        if let Some(ts) = entry.timestamp {
            return iso8601(&ts);
        }
        present(&raw.published)
            .or_else(|| present(&raw.updated))
            .map(str::to_string)
            .unwrap_or_else(|| iso8601(&self.now))
    }

    pub fn classify(&self, entry: &NormalizedEntry, raw: &RawEntry) -> Classification {
        Classification {
            reason: self.decide(entry),
            stamp: self.stamp_for(entry, raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::LenientDateParser;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
    }

    fn entry(id: &str, ts: Option<DateTime<Utc>>) -> NormalizedEntry {
        NormalizedEntry {
            identity: id.to_string(),
            timestamp: ts,
            title: None,
            link: None,
            summary: None,
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap())
    }

    fn seen(pairs: &[(&str, &str)]) -> SeenRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn decide(record: &SeenRecord, e: &NormalizedEntry) -> Reason {
        NoveltyClassifier::new(
            record,
            now(),
            Duration::hours(DEFAULT_WINDOW_HOURS),
            &LenientDateParser,
        )
        .decide(e)
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let empty = SeenRecord::new();
        assert_eq!(decide(&empty, &entry("a", at(2024, 1, 1, 0, 0, 0))), Reason::UnseenRecent);
        assert_eq!(decide(&empty, &entry("a", at(2024, 1, 1, 23, 59, 59))), Reason::UnseenRecent);
        assert_eq!(decide(&empty, &entry("a", at(2023, 12, 31, 23, 59, 59))), Reason::UnseenStale);
    }

    #[test]
    fn unseen_undated_is_new() {
        let reason = decide(&SeenRecord::new(), &entry("a", None));
        assert_eq!(reason, Reason::UnseenUndated);
        assert_eq!(reason.verdict(), Verdict::New);
    }

    #[test]
    fn republished_inside_window_is_new() {
        let record = seen(&[("a", "2024-01-01T00:00:00Z")]);
        assert_eq!(decide(&record, &entry("a", at(2024, 1, 1, 12, 0, 0))), Reason::Republished);
        assert_eq!(decide(&record, &entry("a", at(2023, 12, 1, 0, 0, 0))), Reason::SeenStale);
        assert_eq!(decide(&record, &entry("a", at(2024, 1, 1, 0, 0, 0))), Reason::SeenNotNewer);
    }

    #[test]
    fn seen_undated_is_not_new() {
        let record = seen(&[("a", "2024-01-01T00:00:00Z")]);
        assert_eq!(decide(&record, &entry("a", None)), Reason::SeenUndated);
    }

    #[test]
    fn newer_but_outside_window_is_not_new() {
        let record = seen(&[("a", "2023-01-01T00:00:00Z")]);
        let reason = decide(&record, &entry("a", at(2023, 6, 1, 0, 0, 0)));
        assert_eq!(reason, Reason::SeenStale);
        assert_eq!(reason.verdict(), Verdict::NotNew);
    }

    #[test]
    fn unparseable_stored_stamp_is_conservative() {
        let record = seen(&[("a", "whenever")]);
        let reason = decide(&record, &entry("a", at(2024, 1, 1, 23, 0, 0)));
        assert_eq!(reason, Reason::StoredUnparseable);
        assert_eq!(reason.verdict(), Verdict::NotNew);
    }

    #[test]
    fn naive_stored_stamp_is_read_as_utc() {
        let record = seen(&[("a", "2024-01-01 06:00:00")]);
        assert_eq!(decide(&record, &entry("a", at(2024, 1, 1, 5, 0, 0))), Reason::SeenNotNewer);
        assert_eq!(decide(&record, &entry("a", at(2024, 1, 1, 7, 0, 0))), Reason::Republished);
    }

    #[test]
    fn stamp_prefers_timestamp_then_raw_strings_then_now() {
        let record = SeenRecord::new();
        let clf = NoveltyClassifier::new(&record, now(), Duration::hours(24), &LenientDateParser);

        let dated = entry("a", at(2024, 1, 1, 12, 0, 0));
        assert_eq!(
            clf.stamp_for(&dated, &RawEntry::default()),
            "2024-01-01T12:00:00+00:00"
        );

        let raw = RawEntry {
            published: Some("".into()),
            updated: Some("sometime".into()),
            ..Default::default()
        };
        assert_eq!(clf.stamp_for(&entry("b", None), &raw), "sometime");

        assert_eq!(
            clf.stamp_for(&entry("c", None), &RawEntry::default()),
            "2024-01-02T00:00:00+00:00"
        );
    }
}
