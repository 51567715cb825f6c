//! OpenTelemetry-based observability with file-based trace export.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → SDK provider → FileSpanExporter → JSON lines
//! ```
//!
//! Spans are written to `<data_dir>/nestview/nestview-otlp.json` as OTLP JSON,
//! one batch per line, rotating at 10 MB with three numbered backups. The
//! terminal belongs to the browser, so there is no console output layer.
//!
//! Level resolution: `RUST_LOG`, then `--trace-level`, then the config file,
//! then `info`.
//!
//! # Modules
//!
//! - [`init`]: Subscriber installation
//! - `tracer`: Tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON encoding
//! - `file_writer`: Rotating line writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, TRACE_FILE};
