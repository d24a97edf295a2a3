//! Tracing initialization and subscriber setup.
//!
//! Wires the `tracing` macros through OpenTelemetry into the file-based
//! OTLP exporter.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber with file-based OTLP export.
///
/// Traces go to `zemoji-otlp.json` inside the plugin data directory. The
/// level comes from `config.trace_level`, defaulting to `info`. Safe to call
/// more than once; only the first call installs a subscriber. Failing to
/// create the data directory disables tracing silently, since observability
/// must never take the plugin down.
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = crate::infrastructure::paths::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", "zemoji")]);

    let trace_file = data_dir.join("zemoji-otlp.json");
    let provider = tracer::create_tracer_provider(trace_file, resource);

    let tracer = provider.tracer("zemoji");
    let otel_layer = OpenTelemetryLayer::new(tracer);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer);

    let _ = subscriber.try_init();
}
