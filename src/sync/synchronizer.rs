//! Applies a diff to the destination tree

use crate::error::{EntryError, ErrorSink, SyncError};
use crate::model::{Diff, Entry, Snapshot};
use crate::sync::fs::{FileSystem, LocalFileSystem};
use crate::tree::hasher::{ChecksumGenerator, Checksummer};
use std::cmp::Reverse;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Counts of the operations performed by one synchronization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub deleted_files: usize,
    pub deleted_dirs: usize,
    pub created_dirs: usize,
    pub copied: usize,
    pub updated: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn succeeded(&self) -> usize {
        self.deleted_files + self.deleted_dirs + self.created_dirs + self.copied + self.updated
    }
}

/// Mutates the destination filesystem and its snapshot together.
///
/// The destination snapshot only ever reflects operations that completed, so
/// calling [`Synchronizer::synchronize`] again with a freshly computed diff
/// retries exactly the outstanding work.
#[derive(Debug, Clone, Default)]
pub struct Synchronizer<F = LocalFileSystem, C = ChecksumGenerator> {
    fs: F,
    checksummer: C,
}

impl<F: FileSystem, C: Checksummer> Synchronizer<F, C> {
    pub fn new(fs: F, checksummer: C) -> Self {
        Self { fs, checksummer }
    }

    /// Apply `diff` in a fixed order:
    ///
    /// 1. delete removed files
    /// 2. delete removed directories, deepest first
    /// 3. create added directories, parents first
    /// 4. copy added files
    /// 5. reject modified directories
    /// 6. re-copy modified files
    ///
    /// Per-path failures go to `on_error` and leave the destination snapshot
    /// untouched for that path. A modified directory, or a modified file the
    /// destination snapshot does not track, aborts with an error.
    pub fn synchronize(
        &self,
        diff: &Diff,
        source: &Snapshot,
        destination: &mut Snapshot,
        on_error: &mut ErrorSink<'_>,
    ) -> Result<SyncReport, SyncError> {
        let started = Instant::now();
        let mut report = SyncReport::default();

        for removed in diff.removed.iter().filter(|e| e.is_file()) {
            if self.remove_entry(destination, removed, on_error) {
                report.deleted_files += 1;
            } else {
                report.failed += 1;
            }
        }

        let mut removed_dirs: Vec<&Entry> = diff.removed.iter().filter(|e| e.is_dir()).collect();
        removed_dirs.sort_by_key(|e| Reverse(e.depth()));
        for removed in removed_dirs {
            if self.remove_entry(destination, removed, on_error) {
                report.deleted_dirs += 1;
            } else {
                report.failed += 1;
            }
        }

        let mut added_dirs: Vec<&Entry> = diff.added.iter().filter(|e| e.is_dir()).collect();
        added_dirs.sort_by_key(|e| e.depth());
        for added in added_dirs {
            if self.create_directory(destination, added, on_error)? {
                report.created_dirs += 1;
            } else {
                report.failed += 1;
            }
        }

        for added in diff.added.iter().filter(|e| e.is_file()) {
            if self.transfer(source, destination, added, false, on_error)? {
                report.copied += 1;
            } else {
                report.failed += 1;
            }
        }

        if let Some(modified) = diff.modified.iter().find(|m| m.source.is_dir()) {
            return Err(SyncError::ModifiedDirectory {
                path: modified.source.path().to_string(),
                reason: modified.reason,
            });
        }

        for modified in &diff.modified {
            let tracked = destination.get_required(modified.source.path())?;
            if tracked.is_dir() {
                return Err(SyncError::ModifiedDirectory {
                    path: tracked.path().to_string(),
                    reason: modified.reason,
                });
            }
            debug!(
                path = %modified.source.path(),
                reason = %modified.reason,
                "Updating file"
            );
            if self.transfer(source, destination, &modified.source, true, on_error)? {
                report.updated += 1;
            } else {
                report.failed += 1;
            }
        }

        info!(
            deleted_files = report.deleted_files,
            deleted_dirs = report.deleted_dirs,
            created_dirs = report.created_dirs,
            copied = report.copied,
            updated = report.updated,
            failed = report.failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Synchronization pass finished"
        );
        Ok(report)
    }

    fn remove_entry(
        &self,
        destination: &mut Snapshot,
        entry: &Entry,
        on_error: &mut ErrorSink<'_>,
    ) -> bool {
        let path = destination.resolve(entry.path());
        let result = if entry.is_file() {
            debug!(path = %path.display(), "Deleting file");
            self.fs.remove_file(&path)
        } else {
            debug!(path = %path.display(), "Deleting directory");
            self.fs.remove_dir(&path)
        };

        match result {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Already absent");
            }
            Err(e) => {
                on_error(&path, &EntryError::io(&path, e));
                return false;
            }
        }

        destination.remove(entry.path());
        true
    }

    fn create_directory(
        &self,
        destination: &mut Snapshot,
        entry: &Entry,
        on_error: &mut ErrorSink<'_>,
    ) -> Result<bool, SyncError> {
        let path = destination.resolve(entry.path());
        debug!(path = %path.display(), "Creating directory");

        if let Err(e) = self.fs.create_dir(&path) {
            on_error(&path, &EntryError::io(&path, e));
            return Ok(false);
        }

        destination.insert(entry.clone())?;
        Ok(true)
    }

    /// Copy one file and record it in the destination snapshot once the copy
    /// is verified. `update` selects overwrite and replace-instead-of-insert.
    fn transfer(
        &self,
        source: &Snapshot,
        destination: &mut Snapshot,
        entry: &Entry,
        update: bool,
        on_error: &mut ErrorSink<'_>,
    ) -> Result<bool, SyncError> {
        let from = source.resolve(entry.path());
        let to = destination.resolve(entry.path());
        debug!(from = %from.display(), to = %to.display(), "Copying file");

        match self.copy_verified(&from, &to, update, on_error) {
            Ok(hash) => {
                let hashed = entry.with_hash(hash);
                if update {
                    destination.replace(hashed)?;
                } else {
                    destination.insert(hashed)?;
                }
                Ok(true)
            }
            Err(err) => {
                if err.is_integrity() && update {
                    destination.remove(entry.path());
                }
                on_error(err.path(), &err);
                Ok(false)
            }
        }
    }

    fn copy_verified(
        &self,
        from: &Path,
        to: &Path,
        overwrite: bool,
        on_error: &mut ErrorSink<'_>,
    ) -> Result<String, EntryError> {
        let expected = self
            .checksummer
            .hash_file(from)
            .map_err(|e| EntryError::io(from, e))?;

        self.fs
            .copy_file(from, to, overwrite)
            .map_err(|e| EntryError::io(to, e))?;

        let actual = self
            .checksummer
            .hash_file(to)
            .map_err(|e| EntryError::io(to, e))?;

        if expected != actual {
            warn!(path = %to.display(), %expected, %actual, "Checksum changed during copy");
            if let Err(e) = self.fs.remove_file(to) {
                on_error(to, &EntryError::io(to, e));
            }
            return Err(EntryError::ChecksumMismatch {
                path: to.to_path_buf(),
                expected,
                actual,
            });
        }

        Ok(expected)
    }
}
