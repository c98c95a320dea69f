//! Content checksums using BLAKE3

use crate::error::{EntryError, ErrorSink, SyncError};
use crate::model::{Entry, Snapshot};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::available_parallelism;
use std::time::Instant;
use tracing::{debug, info};

/// Read buffer used while streaming a file through the hasher
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// Computes the checksum of one file on disk
pub trait Checksummer: Sync {
    fn hash_file(&self, path: &Path) -> std::io::Result<String>;
}

/// BLAKE3 checksum generator with a bounded worker pool for batches
#[derive(Debug, Clone)]
pub struct ChecksumGenerator {
    buffer_size: usize,
    workers: usize,
}

impl Default for ChecksumGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE, None)
    }
}

impl ChecksumGenerator {
    /// `workers` defaults to the available parallelism
    pub fn new(buffer_size: usize, workers: Option<usize>) -> Self {
        let workers = workers
            .unwrap_or_else(|| available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);
        Self {
            buffer_size: buffer_size.max(1),
            workers,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Stream a file through BLAKE3 and return the lowercase hex digest
    pub fn hash_file(&self, path: &Path) -> std::io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.buffer_size];

        loop {
            let read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..read]);
        }

        Ok(hex::encode(hasher.finalize().as_bytes()))
    }

    /// Attach checksums to the file entries of `snapshot`.
    ///
    /// Only entries without a hash are processed unless `force` is set. Files
    /// are hashed in parallel; the snapshot itself is only updated afterwards,
    /// sequentially. A file that cannot be read is reported to `on_error` and
    /// its entry is left unchanged. Returns the number of entries updated.
    pub fn fill_hashes(
        &self,
        snapshot: &mut Snapshot,
        force: bool,
        on_error: &mut ErrorSink<'_>,
    ) -> Result<usize, SyncError> {
        let started = Instant::now();
        let pending: Vec<Entry> = snapshot
            .entries()
            .filter(|entry| entry.is_file() && (force || !entry.has_hash()))
            .cloned()
            .collect();
        let total_size: u64 = pending.iter().filter_map(Entry::size).sum();

        info!(count = pending.len(), workers = self.workers, "Hashing files");

        let (hashed, failures) = self.hash_entries(snapshot, &pending);

        for (path, err) in &failures {
            on_error(path, err);
        }

        let updated = hashed.len();
        for entry in hashed {
            snapshot.replace(entry)?;
        }

        info!(
            count = pending.len(),
            updated,
            failed = failures.len(),
            size_mb = total_size / 1024 / 1024,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Hashing finished"
        );
        Ok(updated)
    }

    fn hash_entries(
        &self,
        snapshot: &Snapshot,
        pending: &[Entry],
    ) -> (Vec<Entry>, Vec<(PathBuf, EntryError)>) {
        if pending.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let next = AtomicUsize::new(0);
        let hashed = Mutex::new(Vec::with_capacity(pending.len()));
        let failures = Mutex::new(Vec::new());
        let workers = self.workers.min(pending.len());

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(entry) = pending.get(index) else {
                        break;
                    };
                    let path = snapshot.resolve(entry.path());
                    match self.hash_file(&path) {
                        Ok(hash) => {
                            debug!(path = %path.display(), %hash, "Hashed file");
                            hashed.lock().push(entry.with_hash(hash));
                        }
                        Err(e) => {
                            let err = EntryError::io(&path, e);
                            failures.lock().push((path, err));
                        }
                    }
                });
            }
        });

        (hashed.into_inner(), failures.into_inner())
    }
}

impl Checksummer for ChecksumGenerator {
    fn hash_file(&self, path: &Path) -> std::io::Result<String> {
        ChecksumGenerator::hash_file(self, path)
    }
}
