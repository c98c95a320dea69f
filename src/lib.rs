//! treesync: Incremental One-Way Directory Synchronization
//!
//! Snapshots a directory tree's metadata, diffs it against a destination tree
//! or a stored index, and applies the difference incrementally while keeping
//! the destination's snapshot in step with what actually happened on disk.

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod model;
pub mod report;
pub mod service;
pub mod sink;
pub mod sync;
pub mod tree;

pub use compare::MetadataComparer;
pub use error::{EntryError, ErrorSink, SyncError};
pub use model::{ChangeReason, Diff, Entry, EntryKind, Modification, Snapshot};
pub use sync::{FileSystem, LocalFileSystem, SyncReport, Synchronizer};
pub use tree::{ChecksumGenerator, Checksummer, Walker, WalkerConfig};
