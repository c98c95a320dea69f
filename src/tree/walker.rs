//! Tree enumerator: walks a directory into a snapshot

use crate::error::{EntryError, ErrorSink, SyncError};
use crate::index::ticks;
use crate::model::{Entry, Snapshot};
use crate::tree::path;
use chrono::{DateTime, Utc};
use regex::RegexSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// Walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    /// Regular expressions matched against each candidate's absolute path.
    /// A matching directory is skipped together with its whole subtree.
    pub ignore_patterns: Vec<String>,
}

/// Directory enumerator producing [`Snapshot`]s
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
    base_path: String,
    follow_symlinks: bool,
    ignore: RegexSet,
}

impl Walker {
    /// Create a walker for `root` with no ignore patterns
    pub fn new(root: impl AsRef<Path>) -> Self {
        let base_path = path::normalize_root(root.as_ref());
        Self {
            root: PathBuf::from(&base_path),
            base_path,
            follow_symlinks: false,
            ignore: RegexSet::empty(),
        }
    }

    /// Create a walker with custom configuration; fails on an invalid pattern
    pub fn with_config(root: impl AsRef<Path>, config: &WalkerConfig) -> Result<Self, SyncError> {
        let mut walker = Self::new(root);
        walker.follow_symlinks = config.follow_symlinks;
        walker.ignore = RegexSet::new(&config.ignore_patterns)?;
        Ok(walker)
    }

    /// Normalized root: absolute, with a trailing separator
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Lazily enumerate the tree.
    ///
    /// Within each directory all files come first, then every subdirectory
    /// followed immediately by its own descendants. A directory that cannot be
    /// listed yields one error and the walk continues with its siblings.
    pub fn entries(&self) -> WalkEntries<'_> {
        let inner = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            })
            .into_iter();
        WalkEntries {
            walker: self,
            inner,
        }
    }

    /// Walk the whole tree into a snapshot, reporting isolated failures to `on_error`
    pub fn walk(&self, on_error: &mut ErrorSink<'_>) -> Result<Snapshot, SyncError> {
        info!(path = %self.base_path, "Enumerating");
        let started = Instant::now();

        let mut snapshot = Snapshot::new(self.base_path.clone());
        for item in self.entries() {
            match item {
                Ok(entry) => snapshot.insert(entry)?,
                Err(err) => on_error(error_path(&err, &self.root), &err),
            }
        }

        info!(
            path = %self.base_path,
            count = snapshot.len(),
            size_mb = snapshot.total_size() / 1024 / 1024,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Enumeration finished"
        );
        Ok(snapshot)
    }

    fn is_ignored(&self, full_path: &Path) -> bool {
        !self.ignore.is_empty() && self.ignore.is_match(&full_path.to_string_lossy())
    }

    fn build_entry(&self, dent: &DirEntry) -> Result<Option<Entry>, EntryError> {
        let full_path = dent.path();
        let Some(relative) = path::relative_path(&self.root, full_path) else {
            return Ok(None);
        };

        let metadata = dent.metadata().map_err(EntryError::from)?;
        let modified = metadata
            .modified()
            .map_err(|e| EntryError::io(full_path, e))?;
        let modified_utc = ticks::truncate(DateTime::<Utc>::from(modified));
        let created_utc = metadata
            .created()
            .map(|created| ticks::truncate(DateTime::<Utc>::from(created)))
            .unwrap_or(modified_utc);

        if metadata.is_file() {
            Ok(Some(Entry::file(
                relative,
                created_utc,
                modified_utc,
                metadata.len(),
            )))
        } else if metadata.is_dir() {
            Ok(Some(Entry::directory(relative, created_utc, modified_utc)))
        } else {
            debug!(path = %full_path.display(), "Skipping special file");
            Ok(None)
        }
    }
}

/// Lazy, non-restartable sequence of walked entries
pub struct WalkEntries<'a> {
    walker: &'a Walker,
    inner: walkdir::IntoIter,
}

impl Iterator for WalkEntries<'_> {
    type Item = Result<Entry, EntryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let dent = match self.inner.next()? {
                Ok(dent) => dent,
                Err(err) => return Some(Err(err.into())),
            };

            if dent.depth() == 0 {
                continue;
            }

            if self.walker.is_ignored(dent.path()) {
                if dent.file_type().is_dir() {
                    self.inner.skip_current_dir();
                }
                continue;
            }

            if dent.path_is_symlink() && !self.walker.follow_symlinks {
                debug!(path = %dent.path().display(), "Skipping symbolic link");
                continue;
            }

            match self.walker.build_entry(&dent) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

fn error_path<'e>(err: &'e EntryError, fallback: &'e Path) -> &'e Path {
    let path = err.path();
    if path.as_os_str().is_empty() {
        fallback
    } else {
        path
    }
}
