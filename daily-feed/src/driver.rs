use crate::config::DigestConfig;
use crate::dates::DateParser;
use crate::processor::FeedProcessor;
use crate::traits::{FetchFeed, ParseFeed};
use crate::types::{DigestError, FeedReport};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug)]
pub enum FeedOutcome {
    Succeeded(FeedReport),
    Failed { key: String, error: DigestError },
}

impl FeedOutcome {
    pub fn key(&self) -> &str {
        match self {
            FeedOutcome::Succeeded(report) => &report.key,
            FeedOutcome::Failed { key, .. } => key,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FeedOutcome::Succeeded(_))
    }
}

/// Per-feed outcomes of one run, in configuration order.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FeedOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// The run counts as successful when at least one feed went through.
    pub fn is_success(&self) -> bool {
        self.succeeded() > 0
    }

    /// 0 when at least one feed was processed; 1 when every feed failed,
    /// whether at fetch time or while writing its output or seen-state.
    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        }
    }
}

/// Process every configured feed in order; one feed failing doesn't stop the rest.
pub async fn run_all(
    config: &DigestConfig,
    fetcher: &dyn FetchFeed,
    parser: &dyn ParseFeed,
    dates: &dyn DateParser,
) -> RunSummary {
    let processor = FeedProcessor::new(fetcher, parser, dates, config.window());
    let mut summary = RunSummary::default();

    for source in &config.feeds {
        let outcome = match processor.process(source).await {
            Ok(report) => FeedOutcome::Succeeded(report),
            Err(e) => {
                if e.is_fetch_failure() {
                    info!("Skipping {} (fetch failed).", source.key);
                } else {
                    error!("Failed to process {}: {}", source.key, e);
                }
                FeedOutcome::Failed {
                    key: source.key.clone(),
                    error: e,
                }
            }
        };
        summary.outcomes.push(outcome);
    }

    if summary.is_success() {
        info!(
            "Completed processing feeds. ({} ok, {} failed)",
            summary.succeeded(),
            summary.failed()
        );
    } else {
        error!("No feeds processed successfully.");
    }
    summary
}
