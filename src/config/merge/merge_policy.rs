//! Merge rules: defaults and override order.

use crate::compare::DEFAULT_MODIFIED_TOLERANCE_MS;
use crate::tree::hasher::DEFAULT_BUFFER_SIZE;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Sources added afterwards override these in the order they are added.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("walk.follow_symlinks", false)?
        .set_default(
            "compare.modified_tolerance_ms",
            DEFAULT_MODIFIED_TOLERANCE_MS,
        )?
        .set_default("checksum.buffer_size", DEFAULT_BUFFER_SIZE as u64)?
        .set_default("sync.retries", 2_u64)
}
