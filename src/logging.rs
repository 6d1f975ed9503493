//! Logging System
//!
//! Structured logging through `tracing`. Diagnostics go to stderr so generated
//! output and the error report stay separate from the log stream.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directive variable, e.g. `SCHEMAGEN_LOG=schemagen=debug`.
pub const LOG_ENV: &str = "SCHEMAGEN_LOG";

/// Output format variable: `json` or `text`.
pub const LOG_FORMAT_ENV: &str = "SCHEMAGEN_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

impl LoggingConfig {
    /// Defaults with the format taken from `SCHEMAGEN_LOG_FORMAT` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(format) = std::env::var(LOG_FORMAT_ENV) {
            config.format = format.trim().to_ascii_lowercase();
        }
        config
    }
}

/// Initialize the global subscriber.
///
/// `SCHEMAGEN_LOG` takes precedence over `config.level`.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = build_env_filter(config);
    validate_format(&config.format)?;

    let base_subscriber = Registry::default().with(filter);
    let result = if config.format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| ConfigError::Invalid(format!("initialize logging: {}", e)))
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    EnvFilter::new(config.level.as_str())
}

fn validate_format(format: &str) -> Result<(), ConfigError> {
    match format {
        "json" | "text" => Ok(()),
        other => Err(ConfigError::Invalid(format!(
            "invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}
