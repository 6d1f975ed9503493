//! schemagen: Schema-Driven Code Generation
//!
//! Loads a codegen config and schema, runs an ordered plugin chain that emits enum
//! and model sources, and traces each stage with OpenTelemetry spans.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod plugin;
pub mod schema;
pub mod telemetry;
pub mod templates;
