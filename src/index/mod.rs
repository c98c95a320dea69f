//! Durable snapshot index

pub mod codec;
pub mod ticks;

pub use codec::{persist, read_snapshot, restore, write_snapshot};
