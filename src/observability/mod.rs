//! OpenTelemetry-based observability with file-based trace export.
//!
//! Distributed tracing for the plugin, using OTLP JSON written to a rotating
//! file for offline analysis. Network collectors are unreachable from the
//! plugin sandbox, so the exporter targets the data directory instead:
//!
//! ```text
//! tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → zemoji-otlp.json
//! ```
//!
//! Files rotate at 10MB with 3 retained backups. The trace level comes from
//! the `trace_level` plugin configuration option, defaulting to `info`.
//!
//! # Modules
//!
//! - [`init`]: Tracing initialization and subscriber setup
//! - [`tracer`]: Custom OpenTelemetry tracer provider with file export
//! - [`span_formatter`]: OTLP JSON span serialization
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
