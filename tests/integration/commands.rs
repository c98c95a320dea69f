//! Command services driven end to end, as the CLI runs them.

use super::test_utils::{fixed_time, listing, rel, set_mtime, write_file};
use std::fs;
use tempfile::TempDir;
use treesync::cli::{Commands, DiffFormat, RunContext};
use treesync::config::TreeSyncConfig;
use treesync::index;
use treesync::service::{
    IndexRequest, ReconcileRequest, SyncRequest, TreeSyncService, VerifyRequest,
};
use treesync::sink::ErrorLog;

fn service() -> TreeSyncService {
    TreeSyncService::new(TreeSyncConfig::default())
}

#[test]
fn test_sync_with_index_converges_and_persists() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    let index_path = temp.path().join("dest.idx");

    write_file(&source, &rel(&["photos", "2024", "a.jpg"]), "aaaa");
    write_file(&source, &rel(&["photos", "b.jpg"]), "bb");
    write_file(&source, "notes.txt", "notes");
    write_file(&destination, &rel(&["trash", "x.tmp"]), "x");

    let request = SyncRequest {
        source: source.clone(),
        destination: destination.clone(),
        ignore: Vec::new(),
        index: Some(index_path.clone()),
        retries: None,
    };
    let mut errors = ErrorLog::new();
    let outcome = service().sync(&request, &mut errors).unwrap();

    assert!(errors.is_empty(), "{:?}", errors.reports());
    assert!(outcome.converged());
    assert_eq!(outcome.passes.len(), 1);
    assert_eq!(outcome.initial.added, 5);
    assert_eq!(outcome.initial.removed, 2);
    assert_eq!(listing(&source), listing(&destination));

    let restored = index::restore(&index_path).unwrap();
    assert!(restored.contains(&rel(&["photos", "2024", "a.jpg"])));
    assert!(restored.get("notes.txt").unwrap().has_hash());
    assert!(!restored.contains("trash"));

    // A second run restores the index and finds nothing to do.
    let again = service().sync(&request, &mut errors).unwrap();
    assert!(again.passes.is_empty());
    assert!(again.converged());
}

#[test]
fn test_sync_trusts_the_stored_index() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    let index_path = temp.path().join("dest.idx");
    write_file(&source, "a.txt", "a");
    fs::create_dir_all(&destination).unwrap();

    let request = SyncRequest {
        source: source.clone(),
        destination: destination.clone(),
        ignore: Vec::new(),
        index: Some(index_path.clone()),
        retries: Some(1),
    };
    service().sync(&request, &mut ErrorLog::new()).unwrap();

    // Deleting behind the index's back goes unnoticed until reconcile.
    fs::remove_file(destination.join("a.txt")).unwrap();
    let outcome = service().sync(&request, &mut ErrorLog::new()).unwrap();
    assert!(outcome.passes.is_empty());
    assert!(!destination.join("a.txt").exists());

    let plan = service()
        .reconcile(
            &ReconcileRequest {
                destination: destination.clone(),
                index: index_path.clone(),
                ignore: Vec::new(),
                checksum: false,
            },
            &mut ErrorLog::new(),
        )
        .unwrap();
    assert_eq!(plan.removed, vec!["a.txt".to_string()]);
    service().commit_reconcile(&plan).unwrap();

    let outcome = service().sync(&request, &mut ErrorLog::new()).unwrap();
    assert_eq!(outcome.initial.added, 1);
    assert!(destination.join("a.txt").exists());
}

#[test]
fn test_ignored_source_paths_are_not_copied() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    write_file(&source, &rel(&["node_modules", "dep", "index.js"]), "js");
    write_file(&source, "app.js", "app");
    fs::create_dir_all(&destination).unwrap();

    let request = SyncRequest {
        source,
        destination: destination.clone(),
        ignore: vec!["node_modules".to_string()],
        index: None,
        retries: None,
    };
    let outcome = service().sync(&request, &mut ErrorLog::new()).unwrap();

    assert!(outcome.converged());
    assert_eq!(listing(&destination), vec![("app.js".to_string(), Some("app".to_string()))]);
}

#[test]
fn test_verify_detects_silent_content_change() {
    let temp = TempDir::new().unwrap();
    let tree = temp.path().join("tree");
    let index_path = temp.path().join("tree.idx");
    let report = temp.path().join("report.txt");
    let file = write_file(&tree, "data.bin", "original");
    write_file(&tree, "other.bin", "stable");

    let mut errors = ErrorLog::new();
    let indexed = service()
        .index(
            &IndexRequest {
                source: tree.clone(),
                index: index_path.clone(),
                ignore: Vec::new(),
                checksum: true,
            },
            &mut errors,
        )
        .unwrap();
    assert_eq!(indexed.hashed, 2);

    // Same size, same timestamp, different bytes
    fs::write(&file, "0riginal").unwrap();
    set_mtime(&file, fixed_time());

    let outcome = service()
        .verify(
            &VerifyRequest {
                source: tree,
                index: index_path,
                output: report.clone(),
                ignore: Vec::new(),
            },
            &mut errors,
        )
        .unwrap();

    assert_eq!(outcome.summary.modified, 1);
    assert_eq!(fs::read_to_string(&report).unwrap(), "[MOD CHKS]data.bin\n");
    assert!(errors.is_empty());
}

#[test]
fn test_run_context_diff_json() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    write_file(&source, "only_here.txt", "1");
    write_file(&destination, "only_there.txt", "2");

    let context = RunContext::with_config(TreeSyncConfig::default());
    let output = context
        .execute(&Commands::Diff {
            source,
            destination,
            ignore: Vec::new(),
            format: DiffFormat::Json,
        })
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["added"][0]["path"], "only_here.txt");
    assert_eq!(json["removed"][0]["path"], "only_there.txt");
    assert_eq!(json["summary"]["modified"], 0);
}

#[test]
fn test_run_context_reconcile_with_yes_writes_index() {
    let temp = TempDir::new().unwrap();
    let tree = temp.path().join("tree");
    let index_path = temp.path().join("tree.idx");
    write_file(&tree, "new.txt", "n");
    index::persist(
        &treesync::Snapshot::new(tree.to_string_lossy().into_owned()),
        &index_path,
    )
    .unwrap();

    let context = RunContext::with_config(TreeSyncConfig::default());
    let output = context
        .execute(&Commands::Reconcile {
            destination: tree,
            index: index_path.clone(),
            ignore: Vec::new(),
            checksum: true,
            yes: true,
        })
        .unwrap();

    assert!(output.contains("new.txt"));
    let restored = index::restore(&index_path).unwrap();
    assert!(restored.get("new.txt").unwrap().has_hash());
}

#[test]
fn test_run_context_reports_missing_paths() {
    let temp = TempDir::new().unwrap();
    let context = RunContext::with_config(TreeSyncConfig::default());
    let err = context
        .execute(&Commands::Index {
            source: temp.path().join("nope"),
            index: temp.path().join("x.idx"),
            ignore: Vec::new(),
            checksum: false,
        })
        .unwrap_err();

    assert!(treesync::cli::map_error(&err).contains("Source path does not exist"));
}
