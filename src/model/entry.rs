//! Entry: metadata of a single file or directory

use chrono::{DateTime, Utc};
use std::fmt;
use std::path::Path;

/// Kind of filesystem object an entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Discriminator used in the index file
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::File => "File",
            EntryKind::Directory => "Directory",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable metadata of one filesystem object, keyed by its relative path.
///
/// Entries are values: attaching a hash produces a new `Entry` via
/// [`Entry::with_hash`], the original is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    kind: EntryKind,
    path: String,
    created_utc: DateTime<Utc>,
    modified_utc: DateTime<Utc>,
    size: Option<u64>,
    hash: String,
}

impl Entry {
    /// File entry without a checksum
    pub fn file(
        path: impl Into<String>,
        created_utc: DateTime<Utc>,
        modified_utc: DateTime<Utc>,
        size: u64,
    ) -> Self {
        Self {
            kind: EntryKind::File,
            path: path.into(),
            created_utc,
            modified_utc,
            size: Some(size),
            hash: String::new(),
        }
    }

    pub fn directory(
        path: impl Into<String>,
        created_utc: DateTime<Utc>,
        modified_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            kind: EntryKind::Directory,
            path: path.into(),
            created_utc,
            modified_utc,
            size: None,
            hash: String::new(),
        }
    }

    /// Copy of this entry carrying `hash`. Directories never carry a hash.
    pub fn with_hash(&self, hash: impl Into<String>) -> Self {
        let mut next = self.clone();
        if next.kind == EntryKind::File {
            next.hash = hash.into();
        }
        next
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn created_utc(&self) -> DateTime<Utc> {
        self.created_utc
    }

    pub fn modified_utc(&self) -> DateTime<Utc> {
        self.modified_utc
    }

    /// Size in bytes; `None` for directories
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Content checksum; empty when not computed
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn has_hash(&self) -> bool {
        !self.hash.is_empty()
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Number of path segments, used to order directory removal deepest first
    pub fn depth(&self) -> usize {
        Path::new(&self.path).components().count()
    }
}
