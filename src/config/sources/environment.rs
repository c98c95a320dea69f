//! Environment source: TREESYNC_<SECTION>__<KEY>, e.g. TREESYNC_CHECKSUM__WORKERS=4

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "TREESYNC";

/// Add environment overrides. `TREESYNC_WALK__IGNORE_PATTERNS` is a comma separated list.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("walk.ignore_patterns")
            .try_parsing(true),
    )
}
