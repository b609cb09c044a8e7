#![allow(dead_code)]

use async_trait::async_trait;
use daily_feed::{DigestError, FeedSource, FetchFeed, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const ARTICLES_XML: &str = include_str!("../fixtures/articles.xml");
pub const LONGREADS_ATOM: &str = include_str!("../fixtures/longreads.atom");
pub const LOOSE_XML: &str = include_str!("../fixtures/loose.xml");

/// Serves canned bodies by URL; anything else fails like a 404.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.as_bytes().to_vec());
        self
    }
}

#[async_trait]
impl FetchFeed for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| DigestError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

pub fn source_in(dir: &Path, key: &str, url: &str) -> FeedSource {
    FeedSource::new(
        key,
        url,
        dir.join(format!("daily_{key}.xml")),
        dir.join(format!("last_seen_{key}.json")),
    )
}
