//! Telemetry: tracer provider setup, shutdown, and span finishing.

mod setup;
mod span;

pub use setup::{
    prepare_resource, sdk_disabled, setup, ServiceIdentity, ShutdownGuard, DEFAULT_ENVIRONMENT,
    DEFAULT_SERVICE_VERSION, MAX_QUEUE_SIZE, SDK_DISABLED_ENV,
};
pub use span::finish_span;
