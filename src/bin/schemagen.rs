//! schemagen CLI Binary
//!
//! Loads the codegen config, runs the plugin chain under one deadline, and exports
//! spans for each stage. Any failure prints its cause chain and exits with status 2.

use anyhow::Context as _;
use opentelemetry::global;
use schemagen::cli::{map_error, Cli, FAILURE_EXIT_CODE};
use schemagen::logging::{init_logging, LoggingConfig};
use schemagen::pipeline::{self, RunOptions};
use schemagen::telemetry::{self, ServiceIdentity};
use std::process;
use std::time::Duration;
use tokio::time::Instant;
use tracing::info;

const TRACER_NAME: &str = "schemagen/codegen";

#[tokio::main]
async fn main() {
    let cli = Cli::parse_normalized();

    if let Err(e) = init_logging(&LoggingConfig::from_env()) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(FAILURE_EXIT_CODE);
    }

    if let Err(err) = run(cli.timeout).await {
        eprintln!("{}", map_error(&err));
        process::exit(FAILURE_EXIT_CODE);
    }
}

async fn run(timeout: Duration) -> anyhow::Result<()> {
    let deadline = Instant::now() + timeout;
    let identity = ServiceIdentity::new(env!("CARGO_PKG_NAME"));
    let guard = telemetry::setup(deadline, &identity).context("telemetry::setup")?;
    info!(?timeout, "schemagen starting");

    let tracer = global::tracer(TRACER_NAME);
    let result = pipeline::run(&tracer, deadline, RunOptions::default()).await;

    // Flush on a fresh deadline so an expired run still exports its spans.
    guard.shutdown(timeout).await;
    result.map_err(anyhow::Error::from)
}
