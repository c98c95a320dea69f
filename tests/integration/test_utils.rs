//! Shared fixtures for integration tests: building trees and reading them back.

use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use walkdir::WalkDir;

/// Fixed modification time used to make trees compare equal
pub fn fixed_time() -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
}

/// Relative path built with the platform separator
pub fn rel(parts: &[&str]) -> String {
    parts.iter().collect::<PathBuf>().to_string_lossy().into_owned()
}

/// Write `content` at `root/relative`, creating parents, and pin its mtime
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    set_mtime(&path, fixed_time());
    path
}

pub fn set_mtime(path: &Path, time: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_modified(time)).unwrap();
}

/// Every path under `root` with file contents; directories map to `None`
pub fn listing(root: &Path) -> Vec<(String, Option<String>)> {
    let mut out: Vec<(String, Option<String>)> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| {
            let e = e.unwrap();
            let relative = e
                .path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned();
            let content = if e.file_type().is_file() {
                Some(fs::read_to_string(e.path()).unwrap())
            } else {
                None
            };
            (relative, content)
        })
        .collect();
    out.sort();
    out
}
