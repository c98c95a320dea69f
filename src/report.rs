//! Human-readable diff report

use crate::error::SyncError;
use crate::model::{ChangeReason, Diff};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write one line per changed path: additions, removals, then modifications
/// grouped by reason in the order each reason first appears.
pub fn write_diff<W: Write>(diff: &Diff, mut writer: W) -> std::io::Result<()> {
    for entry in &diff.added {
        writeln!(writer, "[ADD] {}", entry.path())?;
    }
    for entry in &diff.removed {
        writeln!(writer, "[DEL] {}", entry.path())?;
    }

    let mut reasons: Vec<ChangeReason> = Vec::new();
    for modification in &diff.modified {
        if !reasons.contains(&modification.reason) {
            reasons.push(modification.reason);
        }
    }

    for reason in reasons {
        for modification in diff.modified.iter().filter(|m| m.reason == reason) {
            writeln!(
                writer,
                "{}{}",
                reason.report_prefix(),
                modification.source.path()
            )?;
        }
    }

    writer.flush()
}

/// Write the report for `diff` to `path`, creating parent directories
pub fn persist_diff(diff: &Diff, path: impl AsRef<Path>) -> Result<(), SyncError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    write_diff(diff, BufWriter::new(file))?;
    Ok(())
}
