//! Incremental Synchronizer
//!
//! Applies a [`Diff`](crate::model::Diff) to the destination tree and keeps the
//! destination snapshot in lockstep with what actually happened on disk.

pub mod fs;
pub mod synchronizer;

pub use fs::{FileSystem, LocalFileSystem};
pub use synchronizer::{SyncReport, Synchronizer};
