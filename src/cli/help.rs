//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name recorded with every command's log events
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Sync { .. } => "sync",
        Commands::Index { .. } => "index",
        Commands::Verify { .. } => "verify",
        Commands::Reconcile { .. } => "reconcile",
        Commands::Diff { .. } => "diff",
    }
}
