//! Collecting error sink

use crate::error::EntryError;
use std::path::{Path, PathBuf};
use tracing::error;

/// Records every isolated failure handed to it and logs each one
#[derive(Debug, Default)]
pub struct ErrorLog {
    reports: Vec<(PathBuf, String)>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink callback; pass as `&mut |p, e| log.record(p, e)`
    pub fn record(&mut self, path: &Path, err: &EntryError) {
        error!(
            path = %path.display(),
            error = %err,
            integrity = err.is_integrity(),
            "Entry failed"
        );
        self.reports.push((path.to_path_buf(), err.to_string()));
    }

    pub fn reports(&self) -> &[(PathBuf, String)] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
