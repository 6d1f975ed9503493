//! Generation API
//!
//! Runs the registered plugins over a loaded [`Config`] in order, then checks that
//! every schema type resolves through the final type cache.

use crate::config::Config;
use crate::error::GenerateError;
use crate::plugin::{EnumOverridePlugin, ModelGenPlugin, Plugin};
use tracing::{debug, info};

/// Ordered plugin chain
pub struct Generator {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Default for Generator {
    /// Enum overrides wrapping the default model plugin.
    fn default() -> Self {
        Self {
            plugins: vec![Box::new(EnumOverridePlugin::new(ModelGenPlugin::new()))],
        }
    }
}

impl Generator {
    /// A generator with no plugins registered.
    pub fn empty() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Append a plugin after the current chain.
    pub fn add_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Insert a plugin before the current chain.
    pub fn prepend_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.insert(0, Box::new(plugin));
        self
    }

    /// Replace the plugin with the same name in place, or append it.
    pub fn replace_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        let plugin: Box<dyn Plugin> = Box::new(plugin);
        match self.plugins.iter().position(|p| p.name() == plugin.name()) {
            Some(index) => self.plugins[index] = plugin,
            None => self.plugins.push(plugin),
        }
        self
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Run every plugin in order against `config`.
    pub async fn generate(&self, config: &mut Config) -> Result<(), GenerateError> {
        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), "Running plugin");
            plugin
                .mutate_config(config)
                .await
                .map_err(|source| GenerateError::Plugin {
                    name: plugin.name().to_string(),
                    source,
                })?;
        }

        config.check_resolved().map_err(GenerateError::Resolve)?;
        info!(
            plugins = self.plugins.len(),
            types = config.schema.types.len(),
            "Generation complete"
        );
        Ok(())
    }
}
