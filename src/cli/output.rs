//! CLI output: error reporting for the process exit path.

/// Exit status for any failed run.
pub const FAILURE_EXIT_CODE: i32 = 2;

/// Render an error with its full cause chain for stderr.
pub fn map_error(e: &anyhow::Error) -> String {
    format!("{:?}", e)
}
