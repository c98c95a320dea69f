//! Entry point that assembles every configuration source.

use crate::config::merge::merge_policy;
use crate::config::sources::{environment, explicit_file, global_file};
use crate::config::TreeSyncConfig;
use crate::error::SyncError;
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global file, `explicit` if given, then the environment.
    pub fn load(explicit: Option<&Path>) -> Result<TreeSyncConfig, SyncError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            builder = explicit_file::add_to_builder(builder, path)?;
        }
        builder = environment::add_to_builder(builder);

        Self::finish(builder.build()?)
    }

    /// Load defaults and `path` only, ignoring the global file and environment.
    pub fn load_from_file(path: &Path) -> Result<TreeSyncConfig, SyncError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = explicit_file::add_to_builder(builder, path)?;
        Self::finish(builder.build()?)
    }

    fn finish(raw: config::Config) -> Result<TreeSyncConfig, SyncError> {
        let config: TreeSyncConfig = raw.try_deserialize()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            SyncError::Config(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }
}
