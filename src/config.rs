//! Configuration System
//!
//! Loads the generator configuration from default on-disk locations, resolves the
//! schema files it names, and holds the shared mutable state plugins operate on:
//! the model-mapping table and the type resolution cache derived from it.

use crate::error::ConfigError;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod merge {
    pub mod merge_policy;
}
mod models;
mod packages;
mod sources {
    pub mod workspace_file;
}

pub use models::{MappingOrigin, ModelMap, TypeMapEntry};
pub use packages::{Packages, ResolvedType};
pub use sources::workspace_file::CONFIG_FILENAMES;

/// File-level configuration as written by the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// Schema files, relative to the configuration file
    #[serde(default)]
    pub schema: Vec<PathBuf>,

    /// Where generated models go
    pub model: ModelPackage,

    /// User type overrides: schema type name -> Rust paths
    #[serde(default)]
    pub models: BTreeMap<String, TypeMapEntryConfig>,
}

/// User-supplied mapping entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeMapEntryConfig {
    #[serde(default)]
    pub model: Vec<String>,
}

/// Output location and module identity of the generated model file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelPackage {
    /// Primary model output file
    pub filename: PathBuf,

    /// Module name the generated files belong to
    pub package: String,

    /// Rust path generated types are referenced by, e.g. `crate::graph::model`
    pub import_path: String,
}

impl ModelPackage {
    pub fn dir(&self) -> &Path {
        self.filename.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Fully-qualified reference for a generated identifier in this module.
    pub fn qualify(&self, ident: &str) -> String {
        format!("{}::{}", self.import_path, ident)
    }
}

/// Shared generator configuration.
///
/// Plugins receive it as `&mut Config` one at a time in registration order.
/// Changing the model map through [`Config::map_type`] marks the type cache dirty;
/// readers of [`Config::packages`] fail until [`Config::invalidate_type_cache`] runs.
#[derive(Debug, Clone)]
pub struct Config {
    pub schema: Schema,
    pub model: ModelPackage,
    models: ModelMap,
    packages: Packages,
    dirty: bool,
}

impl Config {
    /// Build a config from a loaded schema and user overrides.
    pub fn new(
        schema: Schema,
        model: ModelPackage,
        user_models: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let mut models = ModelMap::with_builtins();
        for (name, model) in user_models {
            models.insert(name, TypeMapEntry::user(model));
        }
        let packages = Packages::build(&models);
        Self {
            schema,
            model,
            models,
            packages,
            dirty: false,
        }
    }

    pub fn models(&self) -> &ModelMap {
        &self.models
    }

    /// Point `name` at a generated type, replacing any previous entry.
    pub fn map_type(&mut self, name: impl Into<String>, reference: impl Into<String>) {
        let name = name.into();
        let reference = reference.into();
        debug!(type_name = %name, reference = %reference, "Mapping schema type");
        self.models.insert(name, TypeMapEntry::generated(reference));
        self.dirty = true;
    }

    /// Rebuild type resolution from the current model map.
    ///
    /// Call after any [`Config::map_type`] and before the next reader.
    pub fn invalidate_type_cache(&mut self) {
        self.packages = Packages::build(&self.models);
        self.dirty = false;
        debug!(types = self.packages.len(), "Type resolution cache rebuilt");
    }

    pub fn is_type_cache_stale(&self) -> bool {
        self.dirty
    }

    /// Type resolution cache; fails if the model map changed since the last rebuild.
    pub fn packages(&self) -> Result<&Packages, ConfigError> {
        if self.dirty {
            return Err(ConfigError::StaleTypeCache);
        }
        Ok(&self.packages)
    }

    /// Check that every schema type resolves through the current cache.
    pub fn check_resolved(&self) -> Result<(), ConfigError> {
        let packages = self.packages()?;
        for ty in &self.schema.types {
            if packages.resolve(&ty.name).is_none() {
                return Err(ConfigError::Unmapped(ty.name.clone()));
            }
        }
        Ok(())
    }
}

/// Loads [`Config`] from default locations.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Search the working directory and its ancestors for a config file.
    pub fn load_from_default_locations() -> Result<Config, ConfigError> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::Invalid(format!("resolve working directory: {}", e)))?;
        Self::load(&cwd)
    }

    /// Search `start` and its ancestors for a config file and load it.
    pub fn load(start: &Path) -> Result<Config, ConfigError> {
        let path = sources::workspace_file::find_config(start).ok_or_else(|| {
            ConfigError::NotFound {
                searched: CONFIG_FILENAMES.join(", "),
                start: start.to_path_buf(),
            }
        })?;
        Self::load_from_file(&path)
    }

    /// Load a specific config file. Relative paths inside it resolve against its directory.
    pub fn load_from_file(path: &Path) -> Result<Config, ConfigError> {
        let builder = merge::merge_policy::builder_with_defaults()
            .and_then(|builder| sources::workspace_file::add_to_builder(builder, path))
            .map_err(|source| ConfigError::Load {
                path: path.to_path_buf(),
                source,
            })?;
        let file: CodegenConfig = builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|source| ConfigError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        Self::from_codegen_config(file, base)
    }

    /// Resolve paths against `base`, read the schema, and build the shared config.
    pub fn from_codegen_config(file: CodegenConfig, base: &Path) -> Result<Config, ConfigError> {
        if file.schema.is_empty() {
            return Err(ConfigError::Invalid("no schema files configured".to_string()));
        }
        if file.model.import_path.trim().is_empty() {
            return Err(ConfigError::Invalid("model.import_path cannot be empty".to_string()));
        }

        let schema_paths: Vec<PathBuf> = file.schema.iter().map(|p| base.join(p)).collect();
        let schema = Schema::load_files(&schema_paths)?;

        let mut model = file.model;
        model.filename = base.join(&model.filename);

        let user_models = file
            .models
            .into_iter()
            .filter(|(_, entry)| !entry.model.is_empty())
            .map(|(name, entry)| (name, entry.model))
            .collect();

        info!(
            schema_files = schema_paths.len(),
            types = schema.types.len(),
            model_file = %model.filename.display(),
            "Configuration loaded"
        );
        Ok(Config::new(schema, model, user_models))
    }
}
