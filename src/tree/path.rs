//! Root normalization and relative path mapping

use std::path::{Path, MAIN_SEPARATOR};

/// Normalize a snapshot root to an absolute path with a trailing separator.
///
/// Existing roots are canonicalized; a missing root is made absolute against
/// the current directory so that the walk can report it through the error sink.
pub fn normalize_root(path: &Path) -> String {
    let absolute = dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf());

    let mut normalized = absolute.to_string_lossy().into_owned();
    if !normalized.ends_with(MAIN_SEPARATOR) {
        normalized.push(MAIN_SEPARATOR);
    }
    normalized
}

/// Path of `full` relative to `root`, using the platform separator
pub fn relative_path(root: &Path, full: &Path) -> Option<String> {
    let relative = full.strip_prefix(root).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }
    Some(relative.to_string_lossy().into_owned())
}
