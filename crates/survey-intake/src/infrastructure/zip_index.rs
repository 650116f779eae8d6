//! ZIP reference index
//!
//! Built once from the reference dataset and read-only afterwards. Lookups
//! fail closed: malformed input, a missing ZIP and an index that never
//! finished loading all answer `None`.

use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::value_objects::{ZipCode, ZipCodeEntry};
use crate::ports::outbound::AddressLookup;

/// Immutable ZIP → entry map keyed by the canonical integer ZIP
#[derive(Debug, Clone, Default)]
pub struct ZipIndex {
    entries: HashMap<u32, ZipCodeEntry>,
    ready: bool,
}

impl ZipIndex {
    /// Build a ready index. The first entry for a ZIP wins.
    pub fn load(entries: impl IntoIterator<Item = ZipCodeEntry>) -> Self {
        let mut map = HashMap::new();
        let mut duplicates = 0usize;

        for entry in entries {
            let key = entry.zip.value();
            if map.contains_key(&key) {
                duplicates += 1;
                debug!(zip = %entry.zip, "duplicate zip ignored");
                continue;
            }
            map.insert(key, entry);
        }

        if duplicates > 0 {
            warn!(duplicates, "zip dataset contains duplicate codes; kept the first of each");
        }

        Self { entries: map, ready: true }
    }

    /// An index that never loaded; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a raw ZIP string. The input is trimmed first.
    pub fn lookup(&self, zip: &str) -> Option<&ZipCodeEntry> {
        if !self.ready {
            return None;
        }
        let zip = ZipCode::parse(zip).ok()?;
        self.entries.get(&zip.value())
    }

    pub fn get(&self, zip: ZipCode) -> Option<&ZipCodeEntry> {
        self.entries.get(&zip.value())
    }
}

impl AddressLookup for ZipIndex {
    fn lookup(&self, zip: &str) -> Option<ZipCodeEntry> {
        ZipIndex::lookup(self, zip).cloned()
    }

    fn is_ready(&self) -> bool {
        self.ready
    }
}

/// Reference dataset loader
///
/// The file is a JSON array of objects carrying `zip_code` (or `zip`) as a
/// number or a 5-digit string, `city`, `state` and optional coordinates.
/// Rows that cannot be read are skipped.
pub struct ZipDataset;

impl ZipDataset {
    pub fn from_json_slice(bytes: &[u8]) -> Result<ZipIndex, DatasetError> {
        let rows: Vec<serde_json::Value> = serde_json::from_slice(bytes)?;
        let total = rows.len();

        let mut skipped = 0usize;
        let entries: Vec<ZipCodeEntry> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<ZipCodeEntry>(row) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    skipped += 1;
                    debug!(%err, "skipping unreadable zip row");
                    None
                }
            })
            .collect();

        if skipped > 0 {
            warn!(skipped, total, "zip dataset rows skipped");
        }

        Ok(ZipIndex::load(entries))
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<ZipIndex, DatasetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::from_json_slice(&bytes)?;
        info!(path = %path.display(), entries = index.len(), "zip codes loaded");
        Ok(index)
    }

    /// Never fails: a dataset that cannot be read yields a not-ready index.
    pub fn load_or_empty(path: impl AsRef<Path>) -> ZipIndex {
        match Self::load_from_path(path.as_ref()) {
            Ok(index) => index,
            Err(err) => {
                error!(error = %err, "zip dataset unavailable; lookups disabled");
                ZipIndex::empty()
            }
        }
    }
}

/// Dataset error type
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid zip dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Shared, swappable index
///
/// Starts not ready; the loaded index is published atomically once the
/// background load finishes. Clones share the same slot.
#[derive(Clone)]
pub struct ZipIndexHandle {
    current: Arc<ArcSwap<ZipIndex>>,
}

impl ZipIndexHandle {
    pub fn new() -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(ZipIndex::empty())),
        }
    }

    pub fn publish(&self, index: ZipIndex) {
        self.current.store(Arc::new(index));
    }

    pub fn snapshot(&self) -> Arc<ZipIndex> {
        self.current.load_full()
    }

    /// Load `path` on the blocking pool and publish the result.
    ///
    /// Must be called from within a tokio runtime. The task resolves to
    /// whether the published index is ready.
    pub fn spawn_load(&self, path: impl Into<PathBuf>) -> JoinHandle<bool> {
        let path = path.into();
        let handle = self.clone();

        tokio::spawn(async move {
            match tokio::task::spawn_blocking(move || ZipDataset::load_or_empty(&path)).await {
                Ok(index) => {
                    let ready = index.is_ready();
                    handle.publish(index);
                    ready
                }
                Err(err) => {
                    error!(error = %err, "zip dataset load task failed");
                    false
                }
            }
        })
    }
}

impl Default for ZipIndexHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressLookup for ZipIndexHandle {
    fn lookup(&self, zip: &str) -> Option<ZipCodeEntry> {
        self.current.load().lookup(zip).cloned()
    }

    fn is_ready(&self) -> bool {
        self.current.load().is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"zip_code": 22030, "city": "Fairfax", "state": "VA", "latitude": 38.85, "longitude": -77.3},
        {"zip_code": 501, "city": "Holtsville", "state": "NY"},
        {"zip": "20001", "city": "Washington", "state": "DC"},
        {"zip_code": 22030, "city": "Duplicate", "state": "XX"},
        {"zip_code": 123456, "city": "Too Long", "state": "ZZ"},
        {"zip_code": "2203a", "city": "Bad", "state": "ZZ"},
        {"city": "No Zip", "state": "ZZ"}
    ]"#;

    fn sample() -> ZipIndex {
        ZipDataset::from_json_slice(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_lookup_known_zip() {
        let index = sample();
        let entry = index.lookup("22030").unwrap();
        assert_eq!(entry.city, "Fairfax");
        assert_eq!(entry.state, "VA");
        assert_eq!(entry.latitude, Some(38.85));
    }

    #[test]
    fn test_leading_zero_zip_from_numeric_row() {
        let index = sample();
        assert_eq!(index.lookup("00501").unwrap().city, "Holtsville");
        assert!(index.lookup("501").is_none());
    }

    #[test]
    fn test_first_duplicate_wins_and_bad_rows_skipped() {
        let index = sample();
        assert_eq!(index.len(), 3);
        assert_eq!(index.lookup("22030").unwrap().city, "Fairfax");
    }

    #[test]
    fn test_lookup_trims_and_fails_closed() {
        let index = sample();
        assert!(index.lookup(" 22030 ").is_some());
        for bad in ["", "2203", "220301", "22O30", "-2203", "00000"] {
            assert!(index.lookup(bad).is_none(), "{bad:?}");
        }
    }

    #[test]
    fn test_empty_index_is_not_ready() {
        let index = ZipIndex::empty();
        assert!(!index.is_ready());
        assert!(index.lookup("22030").is_none());

        let loaded_but_empty = ZipIndex::load(vec![]);
        assert!(loaded_but_empty.is_ready());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            ZipDataset::from_json_slice(b"{\"not\": \"an array\"}"),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let index = ZipDataset::load_or_empty("/definitely/not/here/zipcodes.json");
        assert!(!index.is_ready());
    }

    #[test]
    fn test_handle_publishes_atomically() {
        let handle = ZipIndexHandle::new();
        assert!(!AddressLookup::is_ready(&handle));
        assert!(AddressLookup::lookup(&handle, "22030").is_none());

        let shared = handle.clone();
        shared.publish(sample());
        assert!(AddressLookup::is_ready(&handle));
        assert_eq!(AddressLookup::lookup(&handle, "22030").unwrap().city, "Fairfax");
    }
}
