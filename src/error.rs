//! Error types for the treesync directory synchronizer.

use crate::model::ChangeReason;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures isolated to a single path.
///
/// These never abort a walk, a hashing batch or a synchronization pass; they
/// are handed to the caller's error sink and the operation moves on.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to walk {path:?}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Checksum of {path:?} changed during copy: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl EntryError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        EntryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path the failure refers to
    pub fn path(&self) -> &Path {
        match self {
            EntryError::Io { path, .. }
            | EntryError::Walk { path, .. }
            | EntryError::ChecksumMismatch { path, .. } => path,
        }
    }

    /// True for post-copy integrity failures
    pub fn is_integrity(&self) -> bool {
        matches!(self, EntryError::ChecksumMismatch { .. })
    }
}

impl From<walkdir::Error> for EntryError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(Path::to_path_buf).unwrap_or_default();
        let message = err.to_string();
        match err.into_io_error() {
            Some(source) => EntryError::Io { path, source },
            None => EntryError::Walk { path, message },
        }
    }
}

/// Structural failures that abort the current operation
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Entry already exists: {0}")]
    EntryExists(String),

    #[error("Required entry not found: {0}")]
    EntryNotFound(String),

    #[error("Can't handle modified directory: {path}, reason: {reason}")]
    ModifiedDirectory { path: String, reason: ChangeReason },

    #[error("Can't find base path in {0:?}")]
    MissingBasePath(PathBuf),

    #[error("Invalid index line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid ignore pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::Config(err.to_string())
    }
}

/// Callback receiving every isolated per-path failure
pub type ErrorSink<'a> = dyn FnMut(&Path, &EntryError) + 'a;
