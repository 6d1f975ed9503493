//! Workspace config file source: schemagen.toml or .schemagen.toml in the working
//! directory or the nearest ancestor, plus SCHEMAGEN__* environment overrides.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::{Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File names checked in each directory, in priority order.
pub const CONFIG_FILENAMES: [&str; 2] = ["schemagen.toml", ".schemagen.toml"];

/// Walk from `start` toward the filesystem root and return the first config file found.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        for name in CONFIG_FILENAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                debug!(config_path = %candidate.display(), "Found configuration file");
                return Some(candidate);
            }
        }
    }
    None
}

/// Add the config file and environment overrides to builder.
/// Precedence: file then SCHEMAGEN__<SECTION>__<KEY> environment variables.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(builder
        .add_source(File::from(path).format(FileFormat::Toml).required(true))
        .add_source(
            Environment::with_prefix("SCHEMAGEN")
                .prefix_separator("__")
                .separator("__"),
        ))
}
