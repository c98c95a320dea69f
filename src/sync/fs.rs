//! Filesystem mutations used by the synchronizer

use std::fs::{self, File, FileTimes};
use std::io::{Error, ErrorKind, Result};
use std::path::Path;
use tracing::warn;

/// Destructive filesystem operations, abstracted so that ordering and
/// failure handling can be exercised without touching a real disk.
pub trait FileSystem {
    /// Create one directory. The parent must already exist; an existing
    /// directory at `path` counts as success.
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Copy a file. Without `overwrite` an existing destination is an error.
    fn copy_file(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Remove an empty directory
    fn remove_dir(&self, path: &Path) -> Result<()>;
}

/// [`FileSystem`] backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn create_dir(&self, path: &Path) -> Result<()> {
        match fs::create_dir(path) {
            Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            other => other,
        }
    }

    fn copy_file(&self, from: &Path, to: &Path, overwrite: bool) -> Result<()> {
        if !overwrite && fs::symlink_metadata(to).is_ok() {
            return Err(Error::new(
                ErrorKind::AlreadyExists,
                format!("Destination already exists: {}", to.display()),
            ));
        }

        fs::copy(from, to)?;

        // The copy is complete at this point. A timestamp that cannot be
        // carried over only makes the next diff report the file as modified.
        if let Err(e) = preserve_modified(from, to) {
            warn!(path = %to.display(), error = %e, "Could not preserve modification time");
        }
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path)
    }
}

/// Give `to` the modification time of `from`
fn preserve_modified(from: &Path, to: &Path) -> Result<()> {
    let modified = fs::metadata(from)?.modified()?;
    // A read-only copy can still have its times set through a read handle
    // on unix.
    let copied = File::options()
        .write(true)
        .open(to)
        .or_else(|_| File::open(to))?;
    copied.set_times(FileTimes::new().set_modified(modified))
}
