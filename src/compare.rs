//! Metadata differ
//!
//! Compares a source snapshot against a destination snapshot. Directories are
//! never reported as modified; a path whose kind differs between the two sides
//! is reported as removed (destination's entry) and added (source's entry).
//!
//! For two files, the first matching reason wins:
//! 1. modification times differ by more than the tolerance
//! 2. sizes differ
//! 3. both carry a hash and the hashes differ
//!
//! Every category of the resulting diff is ordered by path, so a directory is
//! always listed before anything below it.

use crate::model::{ChangeReason, Diff, Entry, Modification, Snapshot};
use chrono::TimeDelta;

/// Default tolerance for modification time skew between filesystems
pub const DEFAULT_MODIFIED_TOLERANCE_MS: u64 = 1000;

#[derive(Debug, Clone, Copy)]
pub struct MetadataComparer {
    modified_tolerance: TimeDelta,
}

impl Default for MetadataComparer {
    fn default() -> Self {
        Self::with_tolerance_ms(DEFAULT_MODIFIED_TOLERANCE_MS)
    }
}

impl MetadataComparer {
    pub fn with_tolerance_ms(tolerance_ms: u64) -> Self {
        let millis = i64::try_from(tolerance_ms).unwrap_or(i64::MAX);
        Self {
            modified_tolerance: TimeDelta::try_milliseconds(millis).unwrap_or(TimeDelta::MAX),
        }
    }

    /// Compare `source` against `destination`. Neither snapshot is modified.
    pub fn compare(&self, source: &Snapshot, destination: &Snapshot) -> Diff {
        let mut diff = Diff::default();

        for source_entry in source.sorted_entries() {
            let Some(dest_entry) = destination.get(source_entry.path()) else {
                diff.added.push(source_entry.clone());
                continue;
            };

            if source_entry.is_dir() && dest_entry.is_dir() {
                continue;
            }

            if source_entry.kind() != dest_entry.kind() {
                diff.removed.push(dest_entry.clone());
                diff.added.push(source_entry.clone());
                continue;
            }

            if let Some(reason) = self.change_reason(source_entry, dest_entry) {
                diff.modified.push(Modification {
                    source: source_entry.clone(),
                    destination: dest_entry.clone(),
                    reason,
                });
            }
        }

        for dest_entry in destination.sorted_entries() {
            if !source.contains(dest_entry.path()) {
                diff.removed.push(dest_entry.clone());
            }
        }
        // Type changes were collected during the source pass
        diff.removed.sort_by(|a, b| a.path().cmp(b.path()));

        diff
    }

    /// Reason two file entries differ, if any
    pub fn change_reason(&self, source: &Entry, destination: &Entry) -> Option<ChangeReason> {
        let skew = (source.modified_utc() - destination.modified_utc()).abs();
        if skew > self.modified_tolerance {
            return Some(ChangeReason::ModifiedDateChanged);
        }

        if source.size() != destination.size() {
            return Some(ChangeReason::SizeChanged);
        }

        if source.has_hash() && destination.has_hash() && source.hash() != destination.hash() {
            return Some(ChangeReason::ChecksumChanged);
        }

        None
    }
}
