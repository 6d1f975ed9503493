//! Pipeline runs against an in-memory span exporter

use crate::integration::test_utils::write_project;
use async_trait::async_trait;
use opentelemetry::trace::{Status, TracerProvider as _};
use opentelemetry_sdk::testing::trace::InMemorySpanExporter;
use opentelemetry_sdk::trace::TracerProvider;
use schemagen::api::Generator;
use schemagen::config::Config;
use schemagen::error::{PipelineError, PluginError};
use schemagen::pipeline::{run, ConfigSource, RunOptions, GENERATE_STAGE};
use schemagen::plugin::{EnumOverridePlugin, Plugin};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

struct SlowDelegate(Duration);

#[async_trait]
impl Plugin for SlowDelegate {
    fn name(&self) -> &str {
        "modelgen"
    }

    async fn mutate_config(&self, _config: &mut Config) -> Result<(), PluginError> {
        tokio::time::sleep(self.0).await;
        Ok(())
    }
}

fn provider() -> (TracerProvider, InMemorySpanExporter) {
    let exporter = InMemorySpanExporter::default();
    let provider = TracerProvider::builder()
        .with_simple_exporter(exporter.clone())
        .build();
    (provider, exporter)
}

#[tokio::test]
async fn test_deadline_cancels_slow_generation() {
    let temp_dir = TempDir::new().unwrap();
    write_project(temp_dir.path());
    let (provider, exporter) = provider();
    let tracer = provider.tracer("pipeline-run");

    let options = RunOptions {
        config: ConfigSource::SearchFrom(temp_dir.path().to_path_buf()),
        generator: Generator::empty()
            .add_plugin(EnumOverridePlugin::new(SlowDelegate(Duration::from_secs(5)))),
    };
    let started = std::time::Instant::now();
    let err = run(&tracer, Instant::now() + Duration::from_millis(200), options)
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(
        err,
        PipelineError::DeadlineExceeded { stage } if stage == GENERATE_STAGE
    ));
    assert_eq!(err.to_string(), "api.Generate: deadline exceeded");

    let spans = exporter.get_finished_spans().unwrap();
    let generate = spans.iter().find(|s| s.name == GENERATE_STAGE).unwrap();
    assert!(matches!(generate.status, Status::Error { .. }));
    assert_eq!(generate.events.iter().count(), 1);
}

#[tokio::test]
async fn test_missing_config_reports_load_stage() {
    let temp_dir = TempDir::new().unwrap();
    let (provider, _exporter) = provider();
    let tracer = provider.tracer("pipeline-run");

    let options = RunOptions {
        config: ConfigSource::SearchFrom(temp_dir.path().to_path_buf()),
        ..RunOptions::default()
    };
    let err = run(&tracer, Instant::now() + Duration::from_secs(5), options)
        .await
        .unwrap_err();
    let err = anyhow::Error::new(err);
    let report = format!("{:?}", err);
    assert!(report.starts_with("config::load"));
    assert!(report.contains("schemagen.toml"));
}
