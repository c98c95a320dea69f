//! Snapshot: the entries of one tree keyed by relative path

use crate::error::SyncError;
use crate::model::entry::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

/// A tree's state at one point in time.
///
/// Every stored entry's `path` equals the key it is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    base_path: String,
    entries: HashMap<String, Entry>,
}

impl Snapshot {
    /// Empty snapshot rooted at `base_path`
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            entries: HashMap::new(),
        }
    }

    /// Build a snapshot from entries, failing on a duplicate path
    pub fn from_entries<I>(base_path: impl Into<String>, entries: I) -> Result<Self, SyncError>
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut snapshot = Self::new(base_path);
        for entry in entries {
            snapshot.insert(entry)?;
        }
        Ok(snapshot)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Absolute location of a relative entry path under this snapshot's base
    pub fn resolve(&self, relative: &str) -> PathBuf {
        PathBuf::from(&self.base_path).join(relative)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&Entry> {
        self.entries.get(path)
    }

    pub fn get_required(&self, path: &str) -> Result<&Entry, SyncError> {
        self.entries
            .get(path)
            .ok_or_else(|| SyncError::EntryNotFound(path.to_string()))
    }

    /// Insert a new entry; fails if the path is already tracked
    pub fn insert(&mut self, entry: Entry) -> Result<(), SyncError> {
        if self.entries.contains_key(entry.path()) {
            return Err(SyncError::EntryExists(entry.path().to_string()));
        }
        self.entries.insert(entry.path().to_string(), entry);
        Ok(())
    }

    /// Replace a tracked entry, returning the previous value
    pub fn replace(&mut self, entry: Entry) -> Result<Entry, SyncError> {
        match self.entries.get_mut(entry.path()) {
            Some(slot) => Ok(std::mem::replace(slot, entry)),
            None => Err(SyncError::EntryNotFound(entry.path().to_string())),
        }
    }

    pub fn remove(&mut self, path: &str) -> Option<Entry> {
        self.entries.remove(path)
    }

    /// Entries in arbitrary order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Entries ordered by path. A directory sorts before everything below it.
    pub fn sorted_entries(&self) -> Vec<&Entry> {
        let mut entries: Vec<&Entry> = self.entries.values().collect();
        entries.sort_unstable_by(|a, b| a.path().cmp(b.path()));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all file sizes in bytes
    pub fn total_size(&self) -> u64 {
        self.entries.values().filter_map(Entry::size).sum()
    }
}
