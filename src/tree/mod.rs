//! Filesystem tree access
//!
//! Walking a directory into a [`Snapshot`](crate::model::Snapshot) and
//! computing content checksums for its files.

pub mod hasher;
pub mod path;
pub mod walker;

pub use hasher::{ChecksumGenerator, Checksummer};
pub use walker::{Walker, WalkerConfig};
