//! Walk, compare and synchronize real directory trees.

use super::test_utils::{fixed_time, listing, rel, set_mtime, write_file};
use std::fs;
use tempfile::TempDir;
use treesync::{
    ChangeReason, ChecksumGenerator, LocalFileSystem, MetadataComparer, Synchronizer, Walker,
};

struct Trees {
    _temp: TempDir,
    source: std::path::PathBuf,
    destination: std::path::PathBuf,
}

fn trees() -> Trees {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("source");
    let destination = temp.path().join("destination");
    fs::create_dir_all(&source).unwrap();
    fs::create_dir_all(&destination).unwrap();
    Trees {
        _temp: temp,
        source,
        destination,
    }
}

fn synchronizer() -> Synchronizer {
    Synchronizer::new(LocalFileSystem, ChecksumGenerator::default())
}

#[test]
fn test_new_file_is_copied_with_hash() {
    let t = trees();
    write_file(&t.source, "file.txt", "hello");

    let source = Walker::new(&t.source).walk(&mut |_, e| panic!("{e}")).unwrap();
    let mut destination = Walker::new(&t.destination)
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();

    let diff = MetadataComparer::default().compare(&source, &destination);
    assert_eq!(diff.added.len(), 1);
    assert_eq!(diff.added[0].path(), "file.txt");

    let report = synchronizer()
        .synchronize(&diff, &source, &mut destination, &mut |_, e| panic!("{e}"))
        .unwrap();

    assert_eq!(report.copied, 1);
    let entry = destination.get("file.txt").unwrap();
    assert_eq!(entry.hash(), blake3::hash(b"hello").to_hex().as_str());
    assert_eq!(entry.size(), Some(5));
    assert_eq!(
        fs::read_to_string(t.destination.join("file.txt")).unwrap(),
        "hello"
    );
}

#[test]
fn test_size_change_overwrites_and_updates_entry() {
    let t = trees();
    write_file(&t.source, "a.txt", "0123456789");
    write_file(&t.destination, "a.txt", "01234567890123456789");

    let source = Walker::new(&t.source).walk(&mut |_, e| panic!("{e}")).unwrap();
    let mut destination = Walker::new(&t.destination)
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();

    let diff = MetadataComparer::default().compare(&source, &destination);
    assert_eq!(diff.modified.len(), 1);
    assert_eq!(diff.modified[0].reason, ChangeReason::SizeChanged);

    let report = synchronizer()
        .synchronize(&diff, &source, &mut destination, &mut |_, e| panic!("{e}"))
        .unwrap();

    assert_eq!(report.updated, 1);
    let entry = destination.get("a.txt").unwrap();
    assert_eq!(entry.size(), Some(10));
    assert!(entry.has_hash());
    assert_eq!(
        fs::read_to_string(t.destination.join("a.txt")).unwrap(),
        "0123456789"
    );
}

#[test]
fn test_full_mirror_converges_on_rewalk() {
    let t = trees();
    write_file(&t.source, &rel(&["docs", "guide", "intro.md"]), "intro");
    write_file(&t.source, &rel(&["docs", "index.md"]), "index");
    write_file(&t.source, "top.txt", "top");
    fs::create_dir_all(t.source.join("empty")).unwrap();

    write_file(&t.destination, &rel(&["stale", "deep", "er", "old.txt"]), "old");
    write_file(&t.destination, "top.txt", "outdated content");

    let source = Walker::new(&t.source).walk(&mut |_, e| panic!("{e}")).unwrap();
    let mut destination = Walker::new(&t.destination)
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();

    let comparer = MetadataComparer::default();
    let diff = comparer.compare(&source, &destination);
    synchronizer()
        .synchronize(&diff, &source, &mut destination, &mut |_, e| panic!("{e}"))
        .unwrap();

    assert!(comparer.compare(&source, &destination).is_empty());
    assert_eq!(listing(&t.source), listing(&t.destination));

    let rewalked = Walker::new(&t.destination)
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();
    assert!(
        comparer.compare(&source, &rewalked).is_empty(),
        "copied files keep their source modification time"
    );
}

#[test]
fn test_file_replaced_by_directory() {
    let t = trees();
    write_file(&t.source, &rel(&["x", "inner.txt"]), "inner");
    write_file(&t.destination, "x", "was a file");

    let source = Walker::new(&t.source).walk(&mut |_, e| panic!("{e}")).unwrap();
    let mut destination = Walker::new(&t.destination)
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();

    let diff = MetadataComparer::default().compare(&source, &destination);
    assert!(diff.modified.is_empty());
    assert_eq!(diff.removed.len(), 1);

    synchronizer()
        .synchronize(&diff, &source, &mut destination, &mut |_, e| panic!("{e}"))
        .unwrap();

    assert!(t.destination.join("x").is_dir());
    assert!(destination.get("x").unwrap().is_dir());
    assert_eq!(listing(&t.source), listing(&t.destination));
}

#[test]
fn test_missing_source_file_is_isolated() {
    let t = trees();
    write_file(&t.source, "kept.txt", "kept");
    let vanishing = write_file(&t.source, "vanishing.txt", "gone soon");

    let source = Walker::new(&t.source).walk(&mut |_, e| panic!("{e}")).unwrap();
    let mut destination = Walker::new(&t.destination)
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();
    let diff = MetadataComparer::default().compare(&source, &destination);

    fs::remove_file(&vanishing).unwrap();

    let mut failed = Vec::new();
    let report = synchronizer()
        .synchronize(&diff, &source, &mut destination, &mut |p, _| {
            failed.push(p.to_path_buf())
        })
        .unwrap();

    assert_eq!(report.copied, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(failed.len(), 1);
    assert!(destination.contains("kept.txt"));
    assert!(!destination.contains("vanishing.txt"));

    let remaining = MetadataComparer::default().compare(&source, &destination);
    assert_eq!(remaining.added.len(), 1, "the failed copy stays outstanding");
}

#[test]
fn test_timestamp_only_change_is_recopied() {
    let t = trees();
    write_file(&t.source, "a.txt", "same");
    let dest_file = write_file(&t.destination, "a.txt", "same");
    set_mtime(&dest_file, fixed_time() - std::time::Duration::from_secs(60));

    let source = Walker::new(&t.source).walk(&mut |_, e| panic!("{e}")).unwrap();
    let mut destination = Walker::new(&t.destination)
        .walk(&mut |_, e| panic!("{e}"))
        .unwrap();

    let comparer = MetadataComparer::default();
    let diff = comparer.compare(&source, &destination);
    assert_eq!(diff.modified[0].reason, ChangeReason::ModifiedDateChanged);

    synchronizer()
        .synchronize(&diff, &source, &mut destination, &mut |_, e| panic!("{e}"))
        .unwrap();
    assert!(comparer.compare(&source, &destination).is_empty());
}
