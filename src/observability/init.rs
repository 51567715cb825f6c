//! Tracing subscriber setup.

use super::tracer;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::path::Path;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Trace file name inside the data directory.
pub const TRACE_FILE: &str = "nestview-otlp.json";

/// Installs the global subscriber: an `EnvFilter` at `level` (`RUST_LOG`
/// wins when set) feeding an OpenTelemetry layer that exports to
/// `<data_dir>/nestview-otlp.json`.
///
/// Nothing is ever written to the terminal. Failures (unwritable directory,
/// a subscriber already installed) leave tracing disabled and return `false`.
///
/// # Example
///
/// ```no_run
/// let dir = nestview::infrastructure::data_dir();
/// nestview::observability::init_tracing("debug", &dir);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(level: &str, data_dir: &Path) -> bool {
    if std::fs::create_dir_all(data_dir).is_err() {
        return false;
    }

    let resource = Resource::new(vec![
        KeyValue::new("service.name", "nestview"),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(tracer::SCOPE));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .try_init()
        .is_ok()
}
