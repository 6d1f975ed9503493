//! Enum override plugin.
//!
//! Takes enum types away from the default model plugin: each eligible enum gets a
//! descriptor, a mapping to the generated type, and a definition in a dedicated
//! `enums_gen.rs` file. The default plugin then sees the enums as already mapped
//! and references them instead of defining its own.

use crate::config::Config;
use crate::error::PluginError;
use crate::plugin::Plugin;
use crate::schema::SchemaType;
use crate::templates::{exported_ident, RenderOptions, SourceRenderer, TemplateRenderer};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// File written beside the primary model file.
pub const ENUMS_FILENAME: &str = "enums_gen.rs";

/// Render-time summary of one schema enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub name: String,
    pub description: String,
    pub values: Vec<EnumValueDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    pub name: String,
    pub description: String,
}

impl From<&SchemaType> for EnumDescriptor {
    fn from(ty: &SchemaType) -> Self {
        Self {
            name: ty.name.clone(),
            description: ty.description.clone(),
            values: ty
                .values
                .iter()
                .map(|value| EnumValueDescriptor {
                    name: value.name.clone(),
                    description: value.description.clone(),
                })
                .collect(),
        }
    }
}

/// Path of the enum file for a config.
pub fn enums_output_path(config: &Config) -> PathBuf {
    config.model.dir().join(ENUMS_FILENAME)
}

/// Enum types without a user override, in schema declaration order.
pub fn enum_descriptors(config: &Config) -> Vec<EnumDescriptor> {
    config
        .schema
        .enums()
        .filter(|ty| !config.models().user_defined(&ty.name))
        .map(EnumDescriptor::from)
        .collect()
}

/// Wraps the default model plugin and generates enums ahead of it.
pub struct EnumOverridePlugin<P> {
    delegate: P,
    renderer: Box<dyn TemplateRenderer>,
}

impl<P: Plugin> EnumOverridePlugin<P> {
    pub fn new(delegate: P) -> Self {
        Self::with_renderer(delegate, Box::new(SourceRenderer))
    }

    pub fn with_renderer(delegate: P, renderer: Box<dyn TemplateRenderer>) -> Self {
        Self { delegate, renderer }
    }

    async fn generate_enums(&self, config: &mut Config) -> Result<(), PluginError> {
        let descriptors = enum_descriptors(config);
        if descriptors.is_empty() {
            debug!("No enum types to generate");
            return Ok(());
        }

        for descriptor in &descriptors {
            let reference = config.model.qualify(&exported_ident(&descriptor.name));
            config.map_type(descriptor.name.clone(), reference);
        }

        let filename = enums_output_path(config);
        self.renderer
            .render(RenderOptions {
                package_name: &config.model.package,
                import_path: &config.model.import_path,
                filename: &filename,
                data: &descriptors,
                generated_header: true,
                models: config.models(),
            })
            .await
            .map_err(PluginError::Render)?;

        config.invalidate_type_cache();
        info!(
            enums = descriptors.len(),
            path = %filename.display(),
            "Generated enum overrides"
        );
        Ok(())
    }
}

#[async_trait]
impl<P: Plugin> Plugin for EnumOverridePlugin<P> {
    fn name(&self) -> &str {
        self.delegate.name()
    }

    async fn mutate_config(&self, config: &mut Config) -> Result<(), PluginError> {
        self.generate_enums(config).await?;
        self.delegate.mutate_config(config).await
    }
}
