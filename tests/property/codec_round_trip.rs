use super::strategies::any_snapshot;
use std::path::Path;
use treesync::index::{read_snapshot, write_snapshot};
use treesync::{Entry, Snapshot};

/// Restoring a persisted snapshot yields the same snapshot
#[test]
fn test_write_then_read_is_identity() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any_snapshot(), |snapshot| {
            let mut buffer = Vec::new();
            write_snapshot(&snapshot, &mut buffer).unwrap();
            let restored = read_snapshot(buffer.as_slice(), Path::new("prop.idx")).unwrap();

            assert_eq!(restored, snapshot);
            Ok(())
        })
        .unwrap();
}

/// Output does not depend on map iteration order
#[test]
fn test_write_is_deterministic() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any_snapshot(), |snapshot| {
            let reversed: Vec<Entry> = snapshot.entries().cloned().collect();
            let rebuilt =
                Snapshot::from_entries(snapshot.base_path(), reversed.into_iter().rev()).unwrap();

            let mut first = Vec::new();
            let mut second = Vec::new();
            write_snapshot(&snapshot, &mut first).unwrap();
            write_snapshot(&rebuilt, &mut second).unwrap();

            assert_eq!(first, second);
            Ok(())
        })
        .unwrap();
}
