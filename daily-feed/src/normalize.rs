use crate::dates::DateParser;
use crate::types::{present, NormalizedEntry, RawEntry};
use chrono::{DateTime, Utc};

/// Separator joining title and date in a synthesized identity.
pub const SYNTHETIC_ID_SEPARATOR: &str = "||";

/// Which rule produced an entry's identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Id(String),
    Guid(String),
    Link(String),
    /// `title || published-or-updated`, either side possibly empty.
    Synthesized(String),
}

impl Identity {
    pub fn into_string(self) -> String {
        match self {
            Identity::Id(s) | Identity::Guid(s) | Identity::Link(s) | Identity::Synthesized(s) => s,
        }
    }
}

/// Which field a timestamp came from, or that none could be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    PublishedParsed(DateTime<Utc>),
    UpdatedParsed(DateTime<Utc>),
    Text(DateTime<Utc>),
    Absent,
}

impl Timestamp {
    pub fn value(self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::PublishedParsed(dt) | Timestamp::UpdatedParsed(dt) | Timestamp::Text(dt) => {
                Some(dt)
            }
            Timestamp::Absent => None,
        }
    }
}

pub fn resolve_identity(raw: &RawEntry) -> Identity {
    if let Some(id) = present(&raw.id) {
        return Identity::Id(id.to_string());
    }
    if let Some(guid) = present(&raw.guid) {
        return Identity::Guid(guid.to_string());
    }
    if let Some(link) = present(&raw.link) {
        return Identity::Link(link.to_string());
    }
    let title = raw.title.as_deref().unwrap_or_default();
    let date = present(&raw.published)
        .or_else(|| present(&raw.updated))
        .unwrap_or_default();
    Identity::Synthesized(format!("{title}{SYNTHETIC_ID_SEPARATOR}{date}"))
}

pub fn resolve_timestamp(raw: &RawEntry, dates: &dyn DateParser) -> Timestamp {
    if let Some(dt) = raw.published_parsed.and_then(|t| t.to_utc()) {
        return Timestamp::PublishedParsed(dt);
    }
    if let Some(dt) = raw.updated_parsed.and_then(|t| t.to_utc()) {
        return Timestamp::UpdatedParsed(dt);
    }
    [&raw.published, &raw.updated, &raw.pub_date, &raw.date]
        .into_iter()
        .filter_map(present)
        .find_map(|text| dates.parse_utc(text))
        .map(Timestamp::Text)
        .unwrap_or(Timestamp::Absent)
}

/// Derive the identity, timestamp and display fields of one entry.
pub fn normalize(raw: &RawEntry, dates: &dyn DateParser) -> NormalizedEntry {
    NormalizedEntry {
        identity: resolve_identity(raw).into_string(),
        timestamp: resolve_timestamp(raw, dates).value(),
        title: present(&raw.title).map(str::to_string),
        link: present(&raw.link).map(str::to_string),
        summary: present(&raw.summary)
            .or_else(|| present(&raw.description))
            .map(str::to_string),
    }
}
