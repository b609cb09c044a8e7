use crate::dates::{DateParser, LenientDateParser};
use crate::traits::ParseFeed;
use crate::types::{CivilTime, RawEntry};
use feed_rs::parser::{Builder, Parser};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// RSS / Atom / JSON Feed parser backed by feed-rs.
///
/// Entries without an id keep an empty one so identity falls back to the link,
/// and feed dates are read with the injected date parser.
#[derive(Clone)]
pub struct FeedParser {
    dates: Arc<dyn DateParser>,
}

impl Default for FeedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedParser {
    pub fn new() -> Self {
        Self::with_date_parser(Arc::new(LenientDateParser))
    }

    pub fn with_date_parser(dates: Arc<dyn DateParser>) -> Self {
        Self { dates }
    }

    fn build_parser(&self) -> Parser {
        let dates = Arc::clone(&self.dates);
        Builder::new()
            .id_generator(|_, _, _| String::new())
            .timestamp_parser(move |text| dates.parse_utc(text))
            .build()
    }

    fn convert_entry(entry: feed_rs::model::Entry) -> RawEntry {
        let id = Some(entry.id).filter(|id| !id.is_empty());
        let link = entry.links.into_iter().next().map(|l| l.href);
        let title = entry.title.map(|t| t.content);
        let summary = entry.summary.map(|s| s.content);
        let description = entry.content.and_then(|c| c.body);

        RawEntry {
            id,
            guid: None,
            link,
            title,
            summary,
            description,
            published_parsed: entry.published.as_ref().map(CivilTime::from_utc),
            updated_parsed: entry.updated.as_ref().map(CivilTime::from_utc),
            ..Default::default()
        }
    }
}

impl ParseFeed for FeedParser {
    fn parse(&self, bytes: &[u8]) -> Vec<RawEntry> {
        debug!("Parsing feed content ({} bytes)", bytes.len());

        let feed = match self.build_parser().parse(bytes) {
            Ok(feed) => feed,
            Err(e) => {
                warn!("Failed to parse feed, treating as empty: {}", e);
                return Vec::new();
            }
        };

        let entries: Vec<RawEntry> = feed.entries.into_iter().map(Self::convert_entry).collect();
        info!("Parsed feed with {} entries", entries.len());
        entries
    }
}
