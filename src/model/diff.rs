//! Diff: added, removed and modified entries between two snapshots

use crate::model::entry::Entry;
use std::fmt;

/// The single dimension that classified a file pair as modified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeReason {
    ModifiedDateChanged,
    SizeChanged,
    ChecksumChanged,
}

impl ChangeReason {
    /// Prefix used in the diff report
    pub fn report_prefix(&self) -> &'static str {
        match self {
            ChangeReason::SizeChanged => "[MOD SIZE]",
            ChangeReason::ModifiedDateChanged => "[MOD DATE]",
            ChangeReason::ChecksumChanged => "[MOD CHKS]",
        }
    }
}

impl fmt::Display for ChangeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeReason::ModifiedDateChanged => "ModifiedDateChanged",
            ChangeReason::SizeChanged => "SizeChanged",
            ChangeReason::ChecksumChanged => "ChecksumChanged",
        };
        f.write_str(name)
    }
}

/// A path present on both sides whose metadata differs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub source: Entry,
    pub destination: Entry,
    pub reason: ChangeReason,
}

/// Result of comparing a source snapshot against a destination snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diff {
    /// Source-side entries missing from the destination (or type-changed)
    pub added: Vec<Entry>,
    /// Destination-side entries missing from the source (or type-changed)
    pub removed: Vec<Entry>,
    pub modified: Vec<Modification>,
}

impl Diff {
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.modified.len()
    }

    /// True when both trees are convergent
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }

    pub fn added_size(&self) -> u64 {
        self.added.iter().filter_map(Entry::size).sum()
    }

    pub fn removed_size(&self) -> u64 {
        self.removed.iter().filter_map(Entry::size).sum()
    }

    pub fn modified_size(&self) -> u64 {
        self.modified.iter().filter_map(|m| m.source.size()).sum()
    }
}
