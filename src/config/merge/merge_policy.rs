//! Merge rules: defaults first, then the config file, then environment overrides.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("model.filename", "models_gen.rs")?
        .set_default("model.package", "model")?
        .set_default("model.import_path", "crate::model")
}
