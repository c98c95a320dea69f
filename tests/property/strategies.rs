//! Generators for entries and snapshots

use proptest::prelude::*;
use treesync::index::ticks;
use treesync::{Entry, Snapshot};

/// Ticks between year 1 and roughly year 9000
pub fn any_ticks() -> impl Strategy<Value = i64> {
    0i64..2_840_000_000_000_000_000
}

pub fn any_path() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_. -]{1,12}(/[a-zA-Z0-9_. -]{1,12}){0,3}"
}

pub fn any_hash() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[0-9a-f]{64}"]
}

pub fn any_entry(path: String) -> impl Strategy<Value = Entry> {
    (any::<bool>(), any_ticks(), any_ticks(), any::<u64>(), any_hash()).prop_map(
        move |(is_dir, created, modified, size, hash)| {
            let created = ticks::from_ticks(created).unwrap();
            let modified = ticks::from_ticks(modified).unwrap();
            if is_dir {
                Entry::directory(path.clone(), created, modified)
            } else {
                Entry::file(path.clone(), created, modified, size).with_hash(hash)
            }
        },
    )
}

pub fn any_snapshot() -> impl Strategy<Value = Snapshot> {
    let base = prop_oneof![Just(String::new()), "/[a-z]{1,8}/"];
    let paths = prop::collection::btree_set(any_path(), 0..24);
    (base, paths).prop_flat_map(|(base, paths)| {
        let entries: Vec<_> = paths.into_iter().map(any_entry).collect();
        entries.prop_map(move |entries| Snapshot::from_entries(base.clone(), entries).unwrap())
    })
}
