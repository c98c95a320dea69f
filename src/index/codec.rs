//! Text index format
//!
//! ```text
//! /base/path/
//! Directory|dir|<created ticks>|<modified ticks>
//! File|dir/file.txt|<created ticks>|<modified ticks>|<size>|<hash>
//! ```

use crate::error::SyncError;
use crate::index::ticks;
use crate::model::{Entry, EntryKind, Snapshot};
use chrono::{DateTime, Utc};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

const SEPARATOR: char = '|';
const DIRECTORY_COLUMNS: usize = 4;
const FILE_COLUMNS: usize = 6;

/// Write `snapshot` in index format. Entries are ordered by path.
pub fn write_snapshot<W: Write>(snapshot: &Snapshot, mut writer: W) -> std::io::Result<()> {
    writeln!(writer, "{}", snapshot.base_path())?;

    for entry in snapshot.sorted_entries() {
        let created = ticks::to_ticks(entry.created_utc());
        let modified = ticks::to_ticks(entry.modified_utc());
        match entry.kind() {
            EntryKind::Directory => {
                writeln!(writer, "{}|{}|{}|{}", entry.kind(), entry.path(), created, modified)?
            }
            EntryKind::File => writeln!(
                writer,
                "{}|{}|{}|{}|{}|{}",
                entry.kind(),
                entry.path(),
                created,
                modified,
                entry.size().unwrap_or(0),
                entry.hash()
            )?,
        }
    }

    writer.flush()
}

/// Parse an index. `origin` only labels the missing-header error.
pub fn read_snapshot<R: BufRead>(reader: R, origin: &Path) -> Result<Snapshot, SyncError> {
    let mut lines = reader.lines();
    let base_path = match lines.next() {
        Some(line) => line?,
        None => return Err(SyncError::MissingBasePath(origin.to_path_buf())),
    };

    let mut snapshot = Snapshot::new(base_path);
    for (index, line) in lines.enumerate() {
        let line = line?;
        // The header is line 1
        let number = index + 2;
        if line.trim().is_empty() {
            continue;
        }

        let entry = parse_entry(&line).map_err(|message| SyncError::Parse {
            line: number,
            message,
        })?;
        let path = entry.path().to_string();
        snapshot.insert(entry).map_err(|_| SyncError::Parse {
            line: number,
            message: format!("duplicate path {path:?}"),
        })?;
    }

    Ok(snapshot)
}

fn parse_entry(line: &str) -> Result<Entry, String> {
    let columns: Vec<&str> = line.split(SEPARATOR).collect();
    let kind = match columns[0] {
        "Directory" => EntryKind::Directory,
        "File" => EntryKind::File,
        other => return Err(format!("unknown entry kind {other:?}")),
    };

    let expected = match kind {
        EntryKind::Directory => DIRECTORY_COLUMNS,
        EntryKind::File => FILE_COLUMNS,
    };
    if columns.len() != expected {
        return Err(format!(
            "{kind} record needs {expected} columns, found {}",
            columns.len()
        ));
    }

    let path = columns[1];
    let created = parse_ticks(columns[2], "created")?;
    let modified = parse_ticks(columns[3], "modified")?;

    match kind {
        EntryKind::Directory => Ok(Entry::directory(path, created, modified)),
        EntryKind::File => {
            let size = columns[4]
                .parse::<u64>()
                .map_err(|e| format!("invalid size {:?}: {e}", columns[4]))?;
            Ok(Entry::file(path, created, modified, size).with_hash(columns[5]))
        }
    }
}

fn parse_ticks(value: &str, field: &str) -> Result<DateTime<Utc>, String> {
    let raw = value
        .parse::<i64>()
        .map_err(|e| format!("invalid {field} ticks {value:?}: {e}"))?;
    ticks::from_ticks(raw).ok_or_else(|| format!("{field} ticks {raw} out of range"))
}

/// Persist a snapshot to `path`.
///
/// Writes to a temporary sibling and renames it over the target, so a reader
/// never observes a half-written index.
pub fn persist(snapshot: &Snapshot, path: impl AsRef<Path>) -> Result<(), SyncError> {
    let path = path.as_ref();
    let started = Instant::now();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_sibling(path);
    let written = File::create(&temp_path)
        .and_then(|file| write_snapshot(snapshot, BufWriter::new(file)));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    info!(
        path = %path.display(),
        count = snapshot.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Index persisted"
    );
    Ok(())
}

/// `<path>.tmp`, next to the target
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Load a snapshot previously written by [`persist`]
pub fn restore(path: impl AsRef<Path>) -> Result<Snapshot, SyncError> {
    let path = path.as_ref();
    let started = Instant::now();

    let file = File::open(path)?;
    let snapshot = read_snapshot(BufReader::new(file), path)?;

    info!(
        path = %path.display(),
        count = snapshot.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Index restored"
    );
    Ok(snapshot)
}
