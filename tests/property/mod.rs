//! Property-based tests for the snapshot codec and the comparer

mod codec_round_trip;
mod strategies;
