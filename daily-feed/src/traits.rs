use crate::types::{RawEntry, Result};
use async_trait::async_trait;

/// Retrieves the raw bytes of a feed.
#[async_trait]
pub trait FetchFeed: Send + Sync {
    /// Any transport problem, timeout or non-success status is an error.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// Turns feed bytes into entries.
pub trait ParseFeed: Send + Sync {
    /// Malformed input degrades to whatever could be read, possibly nothing.
    fn parse(&self, bytes: &[u8]) -> Vec<RawEntry>;
}
