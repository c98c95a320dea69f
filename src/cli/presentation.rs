//! CLI presentation: text and json formatters per command.

use crate::error::SyncError;
use crate::service::{
    DiffOutcome, DiffSummary, IndexOutcome, ReconcilePlan, SyncOutcome, VerifyOutcome,
};
use comfy_table::Table;
use owo_colors::OwoColorize;

fn mb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / 1024.0 / 1024.0)
}

fn summary_table(summary: &DiffSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Change", "Entries", "MB"]);
    table.add_row(vec![
        "Added".to_string(),
        summary.added.to_string(),
        mb(summary.added_bytes),
    ]);
    table.add_row(vec![
        "Removed".to_string(),
        summary.removed.to_string(),
        mb(summary.removed_bytes),
    ]);
    table.add_row(vec![
        "Modified".to_string(),
        summary.modified.to_string(),
        mb(summary.modified_bytes),
    ]);
    table
}

fn errors_line(errors: usize) -> Option<String> {
    (errors > 0).then(|| format!("{}", format!("{errors} path(s) failed, see log").yellow()))
}

pub fn format_sync_outcome(outcome: &SyncOutcome, errors: usize) -> String {
    let mut lines = vec![format!("{}", "Initial changes".bold())];
    lines.push(summary_table(&outcome.initial).to_string());

    if !outcome.passes.is_empty() {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::UTF8_FULL);
        table.set_header(vec![
            "Pass", "Deleted", "Created", "Copied", "Updated", "Failed", "Remaining",
        ]);
        for pass in &outcome.passes {
            let report = &pass.report;
            table.add_row(vec![
                pass.attempt.to_string(),
                (report.deleted_files + report.deleted_dirs).to_string(),
                report.created_dirs.to_string(),
                report.copied.to_string(),
                report.updated.to_string(),
                report.failed.to_string(),
                pass.remaining.total_changes().to_string(),
            ]);
        }
        lines.push(table.to_string());
    }

    if outcome.converged() {
        lines.push(format!("{}", "Destination is in sync".green()));
    } else {
        lines.push(format!("{}", "Destination still differs from source".red()));
    }
    lines.extend(errors_line(errors));
    lines.join("\n")
}

pub fn format_index_outcome(outcome: &IndexOutcome, errors: usize) -> String {
    let mut lines = vec![format!(
        "Indexed {} entries ({} MB) into {}",
        outcome.entries,
        mb(outcome.total_bytes),
        outcome.index.display()
    )];
    if outcome.hashed > 0 {
        lines.push(format!("Checksums computed: {}", outcome.hashed));
    }
    lines.extend(errors_line(errors));
    lines.join("\n")
}

pub fn format_verify_outcome(outcome: &VerifyOutcome, errors: usize) -> String {
    let mut lines = vec![summary_table(&outcome.summary).to_string()];
    if outcome.summary.is_empty() {
        lines.push(format!("{}", "Tree matches index".green()));
    } else {
        lines.push(format!(
            "{} difference(s) written to {}",
            outcome.summary.total_changes(),
            outcome.output.display()
        ));
    }
    lines.extend(errors_line(errors));
    lines.join("\n")
}

pub fn format_reconcile_plan(plan: &ReconcilePlan) -> String {
    if plan.is_empty() {
        return "Index already matches the tree".to_string();
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Action", "Path"]);
    for path in &plan.added {
        table.add_row(vec!["add", path.as_str()]);
    }
    for path in &plan.removed {
        table.add_row(vec!["remove", path.as_str()]);
    }

    let mut out = table.to_string();
    if plan.hashed > 0 {
        out.push_str(&format!("\nChecksums computed: {}", plan.hashed));
    }
    out
}

pub fn format_diff_text(outcome: &DiffOutcome) -> String {
    let mut lines = vec![summary_table(&outcome.summary).to_string()];
    for entry in &outcome.diff.added {
        lines.push(format!("{} {}", "+".green(), entry.path()));
    }
    for entry in &outcome.diff.removed {
        lines.push(format!("{} {}", "-".red(), entry.path()));
    }
    for modification in &outcome.diff.modified {
        lines.push(format!(
            "{} {} ({})",
            "~".yellow(),
            modification.source.path(),
            modification.reason
        ));
    }
    lines.join("\n")
}

pub fn format_diff_json(outcome: &DiffOutcome) -> Result<String, SyncError> {
    let entry_json = |entry: &crate::model::Entry| {
        serde_json::json!({
            "path": entry.path(),
            "kind": entry.kind().as_str(),
            "size": entry.size(),
        })
    };

    let out = serde_json::json!({
        "summary": outcome.summary,
        "added": outcome.diff.added.iter().map(entry_json).collect::<Vec<_>>(),
        "removed": outcome.diff.removed.iter().map(entry_json).collect::<Vec<_>>(),
        "modified": outcome
            .diff
            .modified
            .iter()
            .map(|m| serde_json::json!({
                "path": m.source.path(),
                "reason": m.reason.to_string(),
            }))
            .collect::<Vec<_>>(),
    });
    serde_json::to_string_pretty(&out).map_err(|e| SyncError::Io(e.into()))
}
