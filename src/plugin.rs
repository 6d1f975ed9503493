//! Generation plugins.
//!
//! The engine hands the shared [`Config`] to each plugin in registration order.
//! A plugin may rewrite the model map, but must invalidate the type cache before
//! anything downstream reads it.

use crate::config::Config;
use crate::error::PluginError;
use async_trait::async_trait;

mod enums;
mod modelgen;

pub use enums::{
    enum_descriptors, enums_output_path, EnumDescriptor, EnumOverridePlugin, EnumValueDescriptor,
    ENUMS_FILENAME,
};
pub use modelgen::{ModelGenPlugin, MODELGEN_NAME};

/// A generation extension that may rewrite the config before models are emitted.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Name used by the host for ordering and lookup.
    fn name(&self) -> &str;

    async fn mutate_config(&self, config: &mut Config) -> Result<(), PluginError>;
}

#[async_trait]
impl<P: Plugin + ?Sized> Plugin for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn mutate_config(&self, config: &mut Config) -> Result<(), PluginError> {
        (**self).mutate_config(config).await
    }
}
