//! Command services
//!
//! One entry point per CLI verb. Each wires the walker, checksum generator,
//! comparer, synchronizer and index codec together according to the loaded
//! configuration and returns a plain result for presentation.

use crate::compare::MetadataComparer;
use crate::config::TreeSyncConfig;
use crate::error::SyncError;
use crate::index;
use crate::model::{Diff, Snapshot};
use crate::report;
use crate::sink::ErrorLog;
use crate::sync::{LocalFileSystem, SyncReport, Synchronizer};
use crate::tree::{ChecksumGenerator, Walker, WalkerConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub ignore: Vec<String>,
    /// Destination index; restored when present, written after every pass
    pub index: Option<PathBuf>,
    /// Overrides the configured number of passes
    pub retries: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct IndexRequest {
    pub source: PathBuf,
    pub index: PathBuf,
    pub ignore: Vec<String>,
    pub checksum: bool,
}

#[derive(Debug, Clone)]
pub struct VerifyRequest {
    pub source: PathBuf,
    pub index: PathBuf,
    pub output: PathBuf,
    pub ignore: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub destination: PathBuf,
    pub index: PathBuf,
    pub ignore: Vec<String>,
    pub checksum: bool,
}

#[derive(Debug, Clone)]
pub struct DiffRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub ignore: Vec<String>,
}

/// Counts and sizes per diff category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub added: usize,
    pub added_bytes: u64,
    pub removed: usize,
    pub removed_bytes: u64,
    pub modified: usize,
    pub modified_bytes: u64,
}

impl DiffSummary {
    pub fn of(diff: &Diff) -> Self {
        Self {
            added: diff.added.len(),
            added_bytes: diff.added_size(),
            removed: diff.removed.len(),
            removed_bytes: diff.removed_size(),
            modified: diff.modified.len(),
            modified_bytes: diff.modified_size(),
        }
    }

    pub fn total_changes(&self) -> usize {
        self.added + self.removed + self.modified
    }

    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

#[derive(Debug, Clone)]
pub struct SyncPass {
    pub attempt: u32,
    pub report: SyncReport,
    /// Changes still outstanding after this pass
    pub remaining: DiffSummary,
}

#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub initial: DiffSummary,
    pub passes: Vec<SyncPass>,
}

impl SyncOutcome {
    /// True when the last diff computed was empty
    pub fn converged(&self) -> bool {
        self.passes
            .last()
            .map(|pass| pass.remaining.is_empty())
            .unwrap_or_else(|| self.initial.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct IndexOutcome {
    pub index: PathBuf,
    pub entries: usize,
    pub total_bytes: u64,
    pub hashed: usize,
}

#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub output: PathBuf,
    pub summary: DiffSummary,
}

/// Index changes found by reconcile, not yet written
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    pub index_path: PathBuf,
    pub index: Snapshot,
    /// Paths found on disk but missing from the index
    pub added: Vec<String>,
    /// Paths listed in the index but gone from disk
    pub removed: Vec<String>,
    pub hashed: usize,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.hashed == 0
    }
}

#[derive(Debug, Clone)]
pub struct DiffOutcome {
    pub summary: DiffSummary,
    pub diff: Diff,
}

pub struct TreeSyncService {
    config: TreeSyncConfig,
}

impl TreeSyncService {
    pub fn new(config: TreeSyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreeSyncConfig {
        &self.config
    }

    /// Mirror `source` into `destination`, repeating until nothing is left to do
    /// or the pass budget runs out.
    pub fn sync(
        &self,
        request: &SyncRequest,
        errors: &mut ErrorLog,
    ) -> Result<SyncOutcome, SyncError> {
        require_dir(&request.source, "Source path")?;
        require_dir(&request.destination, "Destination path")?;
        info!(
            source = %request.source.display(),
            destination = %request.destination.display(),
            index = ?request.index,
            "Synchronizing"
        );

        let source = self
            .walker(&request.source, &request.ignore)?
            .walk(&mut |p, e| errors.record(p, e))?;
        let mut destination = self.destination_snapshot(request, errors)?;

        let comparer = self.comparer();
        let mut diff = comparer.compare(&source, &destination);
        let initial = DiffSummary::of(&diff);
        log_summary(0, &initial);

        let synchronizer = Synchronizer::new(LocalFileSystem, self.checksums());
        let retries = request.retries.unwrap_or(self.config.sync.retries);
        let mut passes = Vec::new();

        for attempt in 1..=retries {
            if diff.is_empty() {
                break;
            }

            let report = synchronizer.synchronize(
                &diff,
                &source,
                &mut destination,
                &mut |p, e| errors.record(p, e),
            )?;

            if let Some(path) = &request.index {
                index::persist(&destination, path)?;
            }

            diff = comparer.compare(&source, &destination);
            let remaining = DiffSummary::of(&diff);
            log_summary(attempt, &remaining);
            passes.push(SyncPass {
                attempt,
                report,
                remaining,
            });
        }

        let outcome = SyncOutcome { initial, passes };
        if !outcome.converged() {
            warn!(
                remaining = diff.total_changes(),
                "Destination still differs after the last pass"
            );
        }
        Ok(outcome)
    }

    /// Enumerate `source` and write its index, optionally with checksums.
    pub fn index(
        &self,
        request: &IndexRequest,
        errors: &mut ErrorLog,
    ) -> Result<IndexOutcome, SyncError> {
        require_dir(&request.source, "Source path")?;

        let mut snapshot = self
            .walker(&request.source, &request.ignore)?
            .walk(&mut |p, e| errors.record(p, e))?;

        let hashed = if request.checksum {
            self.checksums()
                .fill_hashes(&mut snapshot, true, &mut |p, e| errors.record(p, e))?
        } else {
            0
        };

        index::persist(&snapshot, &request.index)?;

        Ok(IndexOutcome {
            index: request.index.clone(),
            entries: snapshot.len(),
            total_bytes: snapshot.total_size(),
            hashed,
        })
    }

    /// Hash `source` and compare it against a stored index, writing the diff report.
    pub fn verify(
        &self,
        request: &VerifyRequest,
        errors: &mut ErrorLog,
    ) -> Result<VerifyOutcome, SyncError> {
        require_dir(&request.source, "Source path")?;
        require_file(&request.index, "Index file")?;

        let stored = index::restore(&request.index)?;
        let mut source = self
            .walker(&request.source, &request.ignore)?
            .walk(&mut |p, e| errors.record(p, e))?;
        self.checksums()
            .fill_hashes(&mut source, true, &mut |p, e| errors.record(p, e))?;

        let diff = self.comparer().compare(&source, &stored);
        let summary = DiffSummary::of(&diff);
        log_summary(0, &summary);

        report::persist_diff(&diff, &request.output)?;

        Ok(VerifyOutcome {
            output: request.output.clone(),
            summary,
        })
    }

    /// Bring a stored index back in line with what is actually on disk.
    ///
    /// Paths only on disk are added, paths only in the index are dropped;
    /// entries present on both sides are kept as indexed. Nothing is written
    /// until [`TreeSyncService::commit_reconcile`].
    pub fn reconcile(
        &self,
        request: &ReconcileRequest,
        errors: &mut ErrorLog,
    ) -> Result<ReconcilePlan, SyncError> {
        require_dir(&request.destination, "Destination path")?;
        require_file(&request.index, "Index file")?;

        let mut stored = index::restore(&request.index)?;
        let actual = self
            .walker(&request.destination, &request.ignore)?
            .walk(&mut |p, e| errors.record(p, e))?;

        let diff = self.comparer().compare(&stored, &actual);

        let mut removed = Vec::with_capacity(diff.added.len());
        for entry in &diff.added {
            warn!(path = %entry.path(), "Removing from index");
            stored.remove(entry.path());
            removed.push(entry.path().to_string());
        }

        let mut added = Vec::with_capacity(diff.removed.len());
        for entry in &diff.removed {
            warn!(path = %entry.path(), "Adding to index");
            stored.insert(entry.clone())?;
            added.push(entry.path().to_string());
        }

        let hashed = if request.checksum {
            self.checksums()
                .fill_hashes(&mut stored, false, &mut |p, e| errors.record(p, e))?
        } else {
            0
        };

        Ok(ReconcilePlan {
            index_path: request.index.clone(),
            index: stored,
            added,
            removed,
            hashed,
        })
    }

    pub fn commit_reconcile(&self, plan: &ReconcilePlan) -> Result<(), SyncError> {
        index::persist(&plan.index, &plan.index_path)
    }

    /// Compare two live trees without touching either
    pub fn diff(
        &self,
        request: &DiffRequest,
        errors: &mut ErrorLog,
    ) -> Result<DiffOutcome, SyncError> {
        require_dir(&request.source, "Source path")?;
        require_dir(&request.destination, "Destination path")?;

        let source = self
            .walker(&request.source, &request.ignore)?
            .walk(&mut |p, e| errors.record(p, e))?;
        let destination = self
            .walker(&request.destination, &request.ignore)?
            .walk(&mut |p, e| errors.record(p, e))?;

        let diff = self.comparer().compare(&source, &destination);
        Ok(DiffOutcome {
            summary: DiffSummary::of(&diff),
            diff,
        })
    }

    fn destination_snapshot(
        &self,
        request: &SyncRequest,
        errors: &mut ErrorLog,
    ) -> Result<Snapshot, SyncError> {
        if let Some(path) = &request.index {
            if path.is_file() {
                info!(index = %path.display(), "Found destination index");
                return index::restore(path);
            }
            warn!(index = %path.display(), "No destination index found");
        }

        // Ignore patterns only apply to the source; the destination is
        // tracked in full.
        let config = WalkerConfig {
            follow_symlinks: self.config.walk.follow_symlinks,
            ignore_patterns: Vec::new(),
        };
        let snapshot = Walker::with_config(&request.destination, &config)?
            .walk(&mut |p, e| errors.record(p, e))?;

        if let Some(path) = &request.index {
            info!(index = %path.display(), "Persisting destination index");
            index::persist(&snapshot, path)?;
        }
        Ok(snapshot)
    }

    fn walker(&self, root: &Path, extra: &[String]) -> Result<Walker, SyncError> {
        Walker::with_config(root, &self.config.walk.walker_config(extra))
    }

    fn checksums(&self) -> ChecksumGenerator {
        ChecksumGenerator::new(self.config.checksum.buffer_size, self.config.checksum.workers)
    }

    fn comparer(&self) -> MetadataComparer {
        MetadataComparer::with_tolerance_ms(self.config.compare.modified_tolerance_ms)
    }
}

fn require_dir(path: &Path, what: &str) -> Result<(), SyncError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(SyncError::Config(format!("{what} does not exist: {}", path.display())))
    }
}

fn require_file(path: &Path, what: &str) -> Result<(), SyncError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(SyncError::Config(format!("{what} does not exist: {}", path.display())))
    }
}

fn log_summary(attempt: u32, summary: &DiffSummary) {
    info!(
        attempt,
        removed = summary.removed,
        added = summary.added,
        added_mb = summary.added_bytes / 1024 / 1024,
        modified = summary.modified,
        modified_mb = summary.modified_bytes / 1024 / 1024,
        "Changes"
    );
}
