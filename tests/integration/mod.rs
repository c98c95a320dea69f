//! End-to-end tests against real temporary directory trees

mod commands;
mod index_persistence;
mod sync_scenarios;
mod test_utils;
