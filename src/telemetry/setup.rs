//! Tracer provider setup and shutdown.
//!
//! Builds an OTLP/gRPC exporter behind a small batch queue, always samples, and
//! installs the provider and a B3 multi-header propagator globally. The returned
//! [`ShutdownGuard`] must outlive the run; it flushes on a fresh timeout.

use crate::error::{AggregateError, ConfigError};
use opentelemetry::{global, KeyValue};
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::runtime;
use opentelemetry_sdk::trace::{BatchConfigBuilder, BatchSpanProcessor, Sampler, TracerProvider};
use opentelemetry_sdk::Resource;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use opentelemetry_semantic_conventions::SCHEMA_URL;
use opentelemetry_zipkin::Propagator;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Spans buffered before export; the process is short-lived and flushes once.
pub const MAX_QUEUE_SIZE: usize = 3;

/// Placeholder version until deployment metadata supplies one.
pub const DEFAULT_SERVICE_VERSION: &str = "latest";

/// Placeholder environment until deployment metadata supplies one.
pub const DEFAULT_ENVIRONMENT: &str = "current";

const DEPLOYMENT_ENVIRONMENT: &str = "deployment.environment";

/// Environment variable that turns exporter setup off.
pub const SDK_DISABLED_ENV: &str = "OTEL_SDK_DISABLED";

/// Resource identity of the running service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    pub name: String,
    pub version: String,
    pub environment: String,
}

impl ServiceIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: DEFAULT_SERVICE_VERSION.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

/// Build the resource describing this service.
pub fn prepare_resource(identity: &ServiceIdentity) -> Result<Resource, ConfigError> {
    if identity.name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "telemetry service name cannot be empty".to_string(),
        ));
    }
    Ok(Resource::from_schema_url(
        [
            KeyValue::new(SERVICE_VERSION, identity.version.clone()),
            KeyValue::new(SERVICE_NAME, identity.name.clone()),
            KeyValue::new(DEPLOYMENT_ENVIRONMENT, identity.environment.clone()),
        ],
        SCHEMA_URL,
    ))
}

/// True when `OTEL_SDK_DISABLED` is set to `true`.
pub fn sdk_disabled() -> bool {
    std::env::var(SDK_DISABLED_ENV)
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// B3 multi-header propagation (`X-B3-TraceId`, `X-B3-SpanId`, ...).
fn b3_propagator() -> Propagator {
    Propagator::new()
}

/// Install the global tracer provider.
///
/// Exporter and resource failures are collected together; any failure is fatal to
/// the caller. Must run inside a tokio runtime.
pub fn setup(deadline: Instant, identity: &ServiceIdentity) -> Result<ShutdownGuard, AggregateError> {
    if sdk_disabled() {
        info!("{} set; spans will not be exported", SDK_DISABLED_ENV);
        return Ok(ShutdownGuard::disabled());
    }

    let export_timeout = deadline.saturating_duration_since(Instant::now());
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_timeout(export_timeout)
        .build();
    let resource = prepare_resource(identity);

    let (exporter, resource) = match (exporter, resource) {
        (Ok(exporter), Ok(resource)) => (exporter, resource),
        (exporter, resource) => {
            let mut merr = AggregateError::new();
            if let Err(err) = exporter {
                merr.push(err);
            }
            if let Err(err) = resource {
                merr.push(err);
            }
            return Err(merr);
        }
    };

    let processor = BatchSpanProcessor::builder(exporter, runtime::Tokio)
        .with_batch_config(
            BatchConfigBuilder::default()
                .with_max_queue_size(MAX_QUEUE_SIZE)
                .with_max_export_timeout(export_timeout)
                .build(),
        )
        .build();
    let provider = TracerProvider::builder()
        .with_span_processor(processor)
        .with_config(
            opentelemetry_sdk::trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_resource(resource),
        )
        .build();

    global::set_tracer_provider(provider.clone());
    global::set_text_map_propagator(b3_propagator());
    debug!(service = %identity.name, "Tracer provider installed");

    Ok(ShutdownGuard {
        provider: Some(provider),
    })
}

/// Flushes and stops the tracer provider.
///
/// Call [`ShutdownGuard::shutdown`] on every exit path; dropping the guard
/// without it still shuts down, but without a timeout.
#[must_use = "the guard flushes spans when shut down"]
pub struct ShutdownGuard {
    provider: Option<TracerProvider>,
}

impl ShutdownGuard {
    /// A guard with nothing to flush.
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Flush pending spans, giving up after `timeout`.
    pub async fn shutdown(mut self, timeout: Duration) {
        let Some(provider) = self.provider.take() else {
            return;
        };
        let flush = tokio::task::spawn_blocking(move || provider.shutdown());
        match tokio::time::timeout(timeout, flush).await {
            Ok(Ok(Ok(()))) => debug!("Tracer provider shut down"),
            Ok(Ok(Err(err))) => warn!(error = %err, "Tracer provider shutdown failed"),
            Ok(Err(err)) => warn!(error = %err, "Tracer provider shutdown task failed"),
            Err(_) => warn!(?timeout, "Tracer provider shutdown timed out"),
        }
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(err) = provider.shutdown() {
                warn!(error = %err, "Tracer provider shutdown failed");
            }
        }
    }
}
