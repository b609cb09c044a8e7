use crate::classify::NoveltyClassifier;
use crate::config::FeedSource;
use crate::dates::DateParser;
use crate::normalize::normalize;
use crate::output::{build_document_at, channel_title, render};
use crate::seen::{self, SeenRecord};
use crate::traits::{FetchFeed, ParseFeed};
use crate::types::{FeedReport, NormalizedEntry, RawEntry, Result};
use chrono::{DateTime, Duration, Local, Utc};
use std::fs;
use tracing::{debug, info, warn};

/// Novel entries of one run plus the seen-state to persist afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub novel: Vec<NormalizedEntry>,
    pub next: SeenRecord,
}

/// Classify every entry against `prior` and fold the stamps into a new record.
///
/// All entries are judged against `prior`, never against stamps recorded
/// earlier in the same run.
pub fn reconcile(
    prior: &SeenRecord,
    entries: &[RawEntry],
    now: DateTime<Utc>,
    window: Duration,
    dates: &dyn DateParser,
) -> Reconciliation {
    let classifier = NoveltyClassifier::new(prior, now, window, dates);
    debug!("Novelty cutoff {}", classifier.cutoff());
    let mut novel = Vec::new();
    let mut stamps = Vec::with_capacity(entries.len());

    for raw in entries {
        let entry = normalize(raw, dates);
        let classification = classifier.classify(&entry, raw);
        debug!(
            "{} -> {:?} (stamp {})",
            entry.identity, classification.reason, classification.stamp
        );

        stamps.push((entry.identity.clone(), classification.stamp.clone()));
        if classification.is_new() {
            novel.push(entry);
        }
    }

    Reconciliation {
        novel,
        next: prior.with_updates(stamps),
    }
}

/// Runs one feed through fetch, classification, output and seen-state persistence.
pub struct FeedProcessor<'a> {
    fetcher: &'a dyn FetchFeed,
    parser: &'a dyn ParseFeed,
    dates: &'a dyn DateParser,
    window: Duration,
}

impl<'a> FeedProcessor<'a> {
    pub fn new(
        fetcher: &'a dyn FetchFeed,
        parser: &'a dyn ParseFeed,
        dates: &'a dyn DateParser,
        window: Duration,
    ) -> Self {
        Self {
            fetcher,
            parser,
            dates,
            window,
        }
    }

    pub async fn process(&self, source: &FeedSource) -> Result<FeedReport> {
        self.process_at(source, Utc::now()).await
    }

    /// A fetch error returns before any file is touched.
    pub async fn process_at(&self, source: &FeedSource, now: DateTime<Utc>) -> Result<FeedReport> {
        info!("Processing {} -> {}", source.key, source.url);

        let bytes = match self.fetcher.fetch(&source.url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to fetch {}: {}", source.url, e);
                return Err(e);
            }
        };

        let entries = self.parser.parse(&bytes);
        let prior = seen::load(&source.seen_state_path);
        let Reconciliation { novel, next } = reconcile(&prior, &entries, now, self.window, self.dates);

        let title = channel_title(&source.key);
        let document = build_document_at(
            &title,
            &source.url,
            &novel,
            now.with_timezone(&Local).fixed_offset(),
        );
        fs::write(&source.output_path, render(&document)?)?;

        if novel.is_empty() {
            info!(
                "No new items for {}. Wrote empty feed to {}",
                source.key,
                source.output_path.display()
            );
        } else {
            info!(
                "Wrote {} new items to {}",
                novel.len(),
                source.output_path.display()
            );
        }

        seen::save(&source.seen_state_path, &next)?;

        Ok(FeedReport {
            key: source.key.clone(),
            entries: entries.len(),
            novel: novel.len(),
            output_path: source.output_path.clone(),
        })
    }
}
