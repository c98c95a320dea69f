//! Directory Snapshot Model
//!
//! Value types describing one tree's metadata at a point in time, plus the
//! result of comparing two such trees.

pub mod diff;
pub mod entry;
pub mod snapshot;

pub use diff::{ChangeReason, Diff, Modification};
pub use entry::{Entry, EntryKind};
pub use snapshot::Snapshot;
