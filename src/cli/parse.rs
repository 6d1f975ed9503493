//! CLI parse: clap types for schemagen. No behavior beyond argument shaping.

use clap::Parser;
use std::ffi::OsString;
use std::time::Duration;

/// Default overall deadline, as accepted by `--timeout`.
pub const DEFAULT_TIMEOUT: &str = "10s";

/// Single-word flags also accepted with one leading dash.
const LONG_FLAGS: [&str; 1] = ["timeout"];

/// schemagen - generate enum and model sources from a schema
#[derive(Debug, Parser)]
#[command(name = "schemagen")]
#[command(about = "Generate enum and model sources from a schema")]
pub struct Cli {
    /// Overall deadline for loading, generation and span export (e.g. 500ms, 10s, 1m)
    #[arg(long, default_value = DEFAULT_TIMEOUT, value_parser = parse_duration)]
    pub timeout: Duration,
}

impl Cli {
    /// Parse process arguments, accepting `-timeout` as well as `--timeout`.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Parse a duration such as `1500ms`, `10s` or `1m30s`.
pub fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value.trim()).map_err(|e| format!("invalid duration {:?}: {}", value, e))
}

/// Rewrite `-timeout` and `-timeout=x` into their double-dash forms.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if LONG_FLAGS.contains(&name) {
                OsString::from(format!("--{}", rest))
            } else {
                arg
            }
        })
        .collect()
}
