//! Persisting walked snapshots and restoring them.

use super::test_utils::{rel, write_file};
use std::fs;
use tempfile::TempDir;
use treesync::index::{persist, restore};
use treesync::{ChecksumGenerator, MetadataComparer, SyncError, Walker, WalkerConfig};

#[test]
fn test_walked_snapshot_round_trips_exactly() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("tree");
    write_file(&root, &rel(&["a", "b", "c.txt"]), "deep");
    write_file(&root, "top.bin", "top");
    fs::create_dir_all(root.join("empty")).unwrap();

    let mut snapshot = Walker::new(&root).walk(&mut |_, e| panic!("{e}")).unwrap();
    ChecksumGenerator::default()
        .fill_hashes(&mut snapshot, false, &mut |_, e| panic!("{e}"))
        .unwrap();

    let index = temp.path().join("state").join("tree.idx");
    persist(&snapshot, &index).unwrap();
    let restored = restore(&index).unwrap();

    assert_eq!(restored, snapshot);
    assert!(MetadataComparer::default()
        .compare(&snapshot, &restored)
        .is_empty());
}

#[test]
fn test_ignored_paths_never_reach_the_index() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("tree");
    write_file(&root, &rel(&[".git", "HEAD"]), "ref");
    write_file(&root, &rel(&["src", "main.rs"]), "fn main() {}");
    write_file(&root, &rel(&["src", "main.rs.bak"]), "old");

    let config = WalkerConfig {
        ignore_patterns: vec![r"[\\/]\.git$".to_string(), r"\.bak$".to_string()],
        ..Default::default()
    };
    let snapshot = Walker::with_config(&root, &config)
        .unwrap()
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();

    let index = temp.path().join("tree.idx");
    persist(&snapshot, &index).unwrap();
    let text = fs::read_to_string(&index).unwrap();

    assert!(!text.contains(".git"));
    assert!(!text.contains(".bak"));
    assert!(text.contains("main.rs"));
    assert_eq!(text.lines().count(), 3, "header, src, src/main.rs");
}

#[test]
fn test_corrupt_index_reports_line() {
    let temp = TempDir::new().unwrap();
    let index = temp.path().join("broken.idx");
    fs::write(&index, "/base/\nFile|a|0|0|1|\nFile|b|0|0\n").unwrap();

    match restore(&index) {
        Err(SyncError::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_empty_index_file_has_no_base_path() {
    let temp = TempDir::new().unwrap();
    let index = temp.path().join("empty.idx");
    fs::write(&index, "").unwrap();

    assert!(matches!(restore(&index), Err(SyncError::MissingBasePath(_))));
}
