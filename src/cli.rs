//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; the route table dispatches to the command services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, DiffFormat};
pub use presentation::{
    format_diff_json, format_diff_text, format_index_outcome, format_reconcile_plan,
    format_sync_outcome, format_verify_outcome,
};
pub use route::RunContext;
