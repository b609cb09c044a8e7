use crate::classify::DEFAULT_WINDOW_HOURS;
use crate::types::{DigestError, FetchConfig, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// One upstream feed and the two files it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub key: String,
    pub url: String,
    pub output_path: PathBuf,
    pub seen_state_path: PathBuf,
}

impl FeedSource {
    pub fn new(
        key: impl Into<String>,
        url: impl Into<String>,
        output_path: impl Into<PathBuf>,
        seen_state_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            output_path: output_path.into(),
            seen_state_path: seen_state_path.into(),
        }
    }

    /// `daily_<key>.xml` / `last_seen_<key>.json` in the working directory.
    pub fn with_default_paths(key: impl Into<String>, url: impl Into<String>) -> Self {
        let key = key.into();
        let output_path = PathBuf::from(format!("daily_{key}.xml"));
        let seen_state_path = PathBuf::from(format!("last_seen_{key}.json"));
        Self {
            key,
            url: url.into(),
            output_path,
            seen_state_path,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    pub feeds: Vec<FeedSource>,
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
    #[serde(default)]
    pub fetch: FetchConfig,
}

fn default_window_hours() -> i64 {
    DEFAULT_WINDOW_HOURS
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            feeds: vec![
                FeedSource::with_default_paths("bd", "https://evilgodfahim.github.io/bd/articles.xml"),
                FeedSource::with_default_paths(
                    "master",
                    "https://evilgodfahim.github.io/Longreads/filtered.xml",
                ),
            ],
            window_hours: DEFAULT_WINDOW_HOURS,
            fetch: FetchConfig::default(),
        }
    }
}

impl DigestConfig {
    /// Load from a `.toml` or `.json` file, then validate.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let config: DigestConfig = match ext.as_str() {
            "json" => serde_json::from_str(&content)?,
            _ => toml::from_str(&content)
                .map_err(|e| DigestError::Config(format!("{}: {}", path.display(), e)))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            return Err(DigestError::Config("no feeds configured".to_string()));
        }
        if self.window_hours <= 0 {
            return Err(DigestError::Config(format!(
                "window_hours must be positive, got {}",
                self.window_hours
            )));
        }

        let mut keys = HashSet::new();
        for feed in &self.feeds {
            if feed.key.trim().is_empty() {
                return Err(DigestError::Config("feed key must not be blank".to_string()));
            }
            if !keys.insert(feed.key.as_str()) {
                return Err(DigestError::Config(format!("duplicate feed key: {}", feed.key)));
            }
            let url = Url::parse(&feed.url)?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(DigestError::Config(format!(
                    "feed {} must use http(s): {}",
                    feed.key, feed.url
                )));
            }
        }
        Ok(())
    }

    /// Anchor relative output and seen-state paths at `dir`.
    pub fn with_base_dir(mut self, dir: &Path) -> Self {
        for feed in &mut self.feeds {
            if feed.output_path.is_relative() {
                feed.output_path = dir.join(&feed.output_path);
            }
            if feed.seen_state_path.is_relative() {
                feed.seen_state_path = dir.join(&feed.seen_state_path);
            }
        }
        self
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.window_hours)
    }
}
