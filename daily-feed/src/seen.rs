use crate::types::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Identity → last-known timestamp string, as persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeenRecord {
    stamps: BTreeMap<String, String>,
}

impl SeenRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &str) -> Option<&str> {
        self.stamps.get(identity).map(String::as_str)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.stamps.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    /// New record with `updates` applied on top of `self`; later updates win.
    pub fn with_updates<I>(&self, updates: I) -> SeenRecord
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut stamps = self.stamps.clone();
        stamps.extend(updates);
        SeenRecord { stamps }
    }
}

impl FromIterator<(String, String)> for SeenRecord {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        SeenRecord {
            stamps: iter.into_iter().collect(),
        }
    }
}

/// Missing, unreadable or malformed files all load as an empty record.
pub fn load(path: &Path) -> SeenRecord {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No seen-state at {}, starting empty", path.display());
            return SeenRecord::new();
        }
        Err(e) => {
            warn!("Unreadable seen-state {}: {}", path.display(), e);
            return SeenRecord::new();
        }
    };

    match serde_json::from_str::<SeenRecord>(&content) {
        Ok(record) => {
            debug!("Loaded {} seen entries from {}", record.len(), path.display());
            record
        }
        Err(e) => {
            warn!("Ignoring malformed seen-state {}: {}", path.display(), e);
            SeenRecord::new()
        }
    }
}

/// Replace the file at `path` with `record`.
///
/// Writes a sibling temp file and renames it over the target, so a crash
/// mid-write leaves the previous state in place.
pub fn save(path: &Path, record: &SeenRecord) -> Result<()> {
    let mut body = serde_json::to_string_pretty(record)?;
    body.push('\n');

    let tmp = temp_sibling(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(body.as_bytes())?;
        file.sync_all()?;
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    debug!("Saved {} seen entries to {}", record.len(), path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "seen".into());
    name.push(".tmp");
    path.with_file_name(name)
}
