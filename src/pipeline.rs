//! Codegen pipeline
//!
//! Runs `config.Load` then `api.Generate` under a root `main` span. Every stage
//! gets a child span and is bounded by one shared deadline. The first failing
//! stage ends the run.

use crate::api::Generator;
use crate::config::{Config, ConfigLoader};
use crate::error::{ConfigError, PipelineError};
use crate::telemetry::finish_span;
use opentelemetry::trace::{TraceContextExt, Tracer};
use opentelemetry::Context;
use std::error::Error as StdError;
use std::future::Future;
use std::path::PathBuf;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, error, info};

pub const MAIN_SPAN: &str = "main";
pub const CONFIG_LOAD_STAGE: &str = "config.Load";
pub const GENERATE_STAGE: &str = "api.Generate";

/// Where the codegen config is read from
#[derive(Debug, Clone, Default)]
pub enum ConfigSource {
    /// Search upward from the working directory.
    #[default]
    DefaultLocations,
    /// Search upward from the given directory.
    SearchFrom(PathBuf),
    /// Read exactly this file.
    File(PathBuf),
}

impl ConfigSource {
    fn load(&self) -> Result<Config, ConfigError> {
        match self {
            ConfigSource::DefaultLocations => ConfigLoader::load_from_default_locations(),
            ConfigSource::SearchFrom(start) => ConfigLoader::load(start),
            ConfigSource::File(path) => ConfigLoader::load_from_file(path),
        }
    }
}

#[derive(Default)]
pub struct RunOptions {
    pub config: ConfigSource,
    pub generator: Generator,
}

/// Run the pipeline; the root span ends with the run's outcome.
pub async fn run<T>(tracer: &T, deadline: Instant, options: RunOptions) -> Result<(), PipelineError>
where
    T: Tracer,
    T::Span: Send + Sync + 'static,
{
    let cx = Context::current_with_span(tracer.start(MAIN_SPAN));
    let result = run_stages(tracer, &cx, deadline, options).await;

    match &result {
        Ok(()) => {
            info!("Codegen finished");
            finish_span(cx.span(), None);
        }
        Err(err) => {
            error!(error = %err, "Codegen failed");
            finish_span(cx.span(), Some(err));
        }
    }
    result
}

async fn run_stages<T>(
    tracer: &T,
    cx: &Context,
    deadline: Instant,
    options: RunOptions,
) -> Result<(), PipelineError>
where
    T: Tracer,
    T::Span: Send + Sync + 'static,
{
    let RunOptions { config, generator } = options;

    let mut config = stage(tracer, cx, CONFIG_LOAD_STAGE, deadline, async move {
        config.load()
    })
    .await?
    .map_err(PipelineError::ConfigLoad)?;

    stage(tracer, cx, GENERATE_STAGE, deadline, generator.generate(&mut config))
        .await?
        .map_err(PipelineError::Generate)
}

/// Run one stage under a child span of `parent`.
///
/// The outer result carries deadline expiry, the inner one the stage's own error.
/// A stage whose deadline already passed is not started. Either way the span is
/// finished before returning.
async fn stage<T, F, O, E>(
    tracer: &T,
    parent: &Context,
    name: &'static str,
    deadline: Instant,
    fut: F,
) -> Result<Result<O, E>, PipelineError>
where
    T: Tracer,
    T::Span: Send + Sync + 'static,
    F: Future<Output = Result<O, E>>,
    E: StdError + 'static,
{
    let span_cx = parent.with_span(tracer.start_with_context(name, parent));
    if Instant::now() >= deadline {
        let err = PipelineError::DeadlineExceeded { stage: name };
        finish_span(span_cx.span(), Some(&err));
        return Err(err);
    }
    debug!(stage = name, "Stage started");

    match timeout_at(deadline, fut).await {
        Ok(Ok(value)) => {
            finish_span(span_cx.span(), None);
            Ok(Ok(value))
        }
        Ok(Err(err)) => {
            finish_span(span_cx.span(), Some(&err));
            Ok(Err(err))
        }
        Err(_) => {
            let err = PipelineError::DeadlineExceeded { stage: name };
            finish_span(span_cx.span(), Some(&err));
            Err(err)
        }
    }
}
