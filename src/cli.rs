//! CLI domain: argument parsing and error output only.

mod output;
mod parse;

pub use output::{map_error, FAILURE_EXIT_CODE};
pub use parse::{normalize_args, parse_duration, Cli, DEFAULT_TIMEOUT};
