pub mod types;
pub mod config;
pub mod dates;
pub mod normalize;
pub mod seen;
pub mod classify;
pub mod output;
pub mod traits;
pub mod fetcher;
pub mod parser;
pub mod processor;
pub mod driver;

pub use types::*;
pub use config::{DigestConfig, FeedSource};
pub use dates::{DateParser, LenientDateParser};
pub use seen::SeenRecord;
pub use classify::{NoveltyClassifier, Verdict};
pub use traits::{FetchFeed, ParseFeed};
pub use fetcher::Fetcher;
pub use parser::FeedParser;
pub use processor::FeedProcessor;
pub use driver::{run_all, FeedOutcome, RunSummary};
