//! CLI route: single route table and run context. Dispatches to command services and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::{Commands, DiffFormat};
use crate::cli::presentation::{
    format_diff_json, format_diff_text, format_index_outcome, format_reconcile_plan,
    format_sync_outcome, format_verify_outcome,
};
use crate::config::{ConfigLoader, TreeSyncConfig};
use crate::error::SyncError;
use crate::service::{
    DiffRequest, IndexRequest, ReconcileRequest, SyncRequest, TreeSyncService, VerifyRequest,
};
use crate::sink::ErrorLog;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: loaded configuration and command services.
pub struct RunContext {
    service: TreeSyncService,
}

impl RunContext {
    /// Create run context from an optional explicit config path. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, SyncError> {
        let config = ConfigLoader::load(config_path.as_deref())?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: TreeSyncConfig) -> Self {
        Self {
            service: TreeSyncService::new(config),
        }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        let started = Instant::now();
        let mut errors = ErrorLog::new();
        let result = self.execute_inner(command, &mut errors);
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            failed_paths = errors.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn execute_inner(
        &self,
        command: &Commands,
        errors: &mut ErrorLog,
    ) -> Result<String, SyncError> {
        match command {
            Commands::Sync {
                source,
                destination,
                ignore,
                index,
                retries,
            } => {
                let request = SyncRequest {
                    source: source.clone(),
                    destination: destination.clone(),
                    ignore: ignore.clone(),
                    index: index.clone(),
                    retries: *retries,
                };
                let outcome = self.service.sync(&request, errors)?;
                Ok(format_sync_outcome(&outcome, errors.len()))
            }
            Commands::Index {
                source,
                index,
                ignore,
                checksum,
            } => {
                let request = IndexRequest {
                    source: source.clone(),
                    index: index.clone(),
                    ignore: ignore.clone(),
                    checksum: *checksum,
                };
                let outcome = self.service.index(&request, errors)?;
                Ok(format_index_outcome(&outcome, errors.len()))
            }
            Commands::Verify {
                source,
                index,
                output,
                ignore,
            } => {
                let request = VerifyRequest {
                    source: source.clone(),
                    index: index.clone(),
                    output: output.clone(),
                    ignore: ignore.clone(),
                };
                let outcome = self.service.verify(&request, errors)?;
                Ok(format_verify_outcome(&outcome, errors.len()))
            }
            Commands::Reconcile {
                destination,
                index,
                ignore,
                checksum,
                yes,
            } => {
                let request = ReconcileRequest {
                    destination: destination.clone(),
                    index: index.clone(),
                    ignore: ignore.clone(),
                    checksum: *checksum,
                };
                self.handle_reconcile(&request, *yes, errors)
            }
            Commands::Diff {
                source,
                destination,
                ignore,
                format,
            } => {
                let request = DiffRequest {
                    source: source.clone(),
                    destination: destination.clone(),
                    ignore: ignore.clone(),
                };
                let outcome = self.service.diff(&request, errors)?;
                match format {
                    DiffFormat::Json => format_diff_json(&outcome),
                    DiffFormat::Text => Ok(format_diff_text(&outcome)),
                }
            }
        }
    }

    fn handle_reconcile(
        &self,
        request: &ReconcileRequest,
        yes: bool,
        errors: &mut ErrorLog,
    ) -> Result<String, SyncError> {
        let plan = self.service.reconcile(request, errors)?;
        let summary = format_reconcile_plan(&plan);
        if plan.is_empty() {
            return Ok(summary);
        }

        if !yes {
            use dialoguer::Confirm;
            println!("{}", summary);
            let confirmed = Confirm::new()
                .with_prompt(format!("Write updated index to {}?", plan.index_path.display()))
                .interact()
                .map_err(|e| SyncError::Config(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Reconcile cancelled".to_string());
            }
        }

        self.service.commit_reconcile(&plan)?;
        Ok(format!(
            "{}\nIndex written: {}",
            summary,
            plan.index_path.display()
        ))
    }
}
