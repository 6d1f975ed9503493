//! Error types for the schemagen generation pipeline.
//!
//! Every wrap names the operation that failed; the full chain is walked with
//! `std::error::Error::source` by the binary and by span finishing.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Boxed error used where independent causes of different types are collected.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Configuration and schema loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration file found (searched {searched} from {start:?} upward)")]
    NotFound { searched: String, start: PathBuf },

    #[error("read configuration {path:?}")]
    Load {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },

    #[error("read schema {path:?}")]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse schema {path:?}")]
    SchemaParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("type resolution cache is stale: model map changed without invalidate_type_cache")]
    StaleTypeCache,

    #[error("type {0} has no model mapping")]
    Unmapped(String),
}

/// Template rendering and output errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("format template for {filename:?}")]
    Format {
        filename: PathBuf,
        #[source]
        source: fmt::Error,
    },

    #[error("{name} resolves to {reference}, outside module {package}")]
    ForeignType {
        name: String,
        reference: String,
        package: String,
    },

    #[error("cannot generate identifier for {name:?}: {reason}")]
    Identifier { name: String, reason: String },

    #[error("create directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors returned by generation plugins
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("render enums")]
    Render(#[source] RenderError),

    #[error("render models")]
    Models(#[source] RenderError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{plugin}: {message}")]
    Failed { plugin: String, message: String },
}

/// Errors from the generation engine
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("plugin {name}")]
    Plugin {
        name: String,
        #[source]
        source: PluginError,
    },

    #[error("resolve schema types")]
    Resolve(#[source] ConfigError),
}

/// Top-level pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config::load")]
    ConfigLoad(#[source] ConfigError),

    #[error("api::generate")]
    Generate(#[source] GenerateError),

    #[error("{stage}: deadline exceeded")]
    DeadlineExceeded { stage: &'static str },
}

/// Several independent failures from one logical operation.
///
/// Causes keep their insertion order and the list is never empty once
/// returned from [`AggregateError::into_result`].
#[derive(Debug, Default)]
pub struct AggregateError {
    errors: Vec<BoxError>,
}

impl AggregateError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: impl Into<BoxError>) {
        self.errors.push(err.into());
    }

    pub fn errors(&self) -> &[BoxError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(value)` when nothing was collected, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 { "error" } else { "errors" };
        write!(f, "{} {} occurred:", self.errors.len(), noun)?;
        for err in &self.errors {
            write!(f, "\n\t* {}", chain_message(err.as_ref()))?;
        }
        Ok(())
    }
}

impl StdError for AggregateError {}

/// Join an error and its sources into one `a: b: c` line.
pub fn chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
