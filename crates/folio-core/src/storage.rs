//! String key-value persistence, modeled on browser local storage.
//!
//! Values are opaque strings. Each backend enforces a byte quota over the
//! total size of all keys and values; a write that would exceed it fails with
//! [`Error::QuotaExceeded`] and changes nothing.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument, warn};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

fn check_quota(entries: &BTreeMap<String, String>, key: &str, value: &str, quota: usize) -> Result<()> {
    let previous = entries.get(key).map_or(0, |v| key.len() + v.len());
    let needed = used_bytes(entries) - previous + key.len() + value.len();
    if needed > quota {
        return Err(Error::QuotaExceeded { key: key.to_string(), needed, quota });
    }
    Ok(())
}

/// Volatile store, used by tests and by callers that do not want disk state.
#[derive(Debug, Clone)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, String>,
    quota: usize,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::with_quota(usize::MAX)
    }

    pub fn with_quota(quota: usize) -> Self {
        Self { entries: BTreeMap::new(), quota }
    }
}

impl Default for MemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        check_quota(&self.entries, key, value, self.quota)?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file; every write rewrites the file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    quota: usize,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>, quota: usize) -> Self {
        Self { path: path.into(), quota }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let backup = self.corrupt_path();
                fs::copy(&self.path, &backup)?;
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "Storage file is unreadable, starting from an empty store."
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Where an unreadable storage file is copied before it is replaced.
    pub fn corrupt_path(&self) -> PathBuf {
        self.path.with_extension("json.corrupt")
    }

    #[instrument(skip(self, entries), fields(path = %self.path.display()))]
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json_data = serde_json::to_string_pretty(entries)?;
        // The old file stays intact until the rename.
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json_data)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!(keys = entries.len(), "Storage file written.");
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        check_quota(&entries, key, value, self.quota)?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_rejects_writes_over_quota_and_keeps_old_value() {
        let mut store = MemoryKeyValueStore::with_quota(10);
        store.set("k", "short").unwrap();
        let err = store.set("k", "a value that is far too long").unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn replacing_a_value_only_counts_the_new_size() {
        let mut store = MemoryKeyValueStore::with_quota(6);
        store.set("k", "12345").unwrap();
        store.set("k", "54321").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("54321"));
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let mut store = FileKeyValueStore::new(&path, usize::MAX);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.remove("a").unwrap();

        let reopened = FileKeyValueStore::new(&path, usize::MAX);
        assert_eq!(reopened.get("a").unwrap(), None);
        assert_eq!(reopened.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn unreadable_file_is_backed_up_and_treated_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2").unwrap();
        let mut store = FileKeyValueStore::new(&path, usize::MAX);

        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(fs::read_to_string(store.corrupt_path()).unwrap(), "[1, 2");

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
