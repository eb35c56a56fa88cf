//! Span export to a local OTLP JSON file.
//!
//! The plugin runs inside a WASI sandbox with no collector to talk to, so
//! finished spans are written one batch per line to a rotating file:
//!
//! ```text
//! tracing spans → tracing-opentelemetry → JsonLinesExporter → notepane-otlp.json
//! ```
//!
//! The filter comes from the `trace_level` plugin option (an `EnvFilter`
//! directive such as `"debug"` or `"notepane::cache=trace"`), defaulting to
//! `"info"`.
//!
//! ```no_run
//! use notepane::observability::init_tracing;
//! use notepane::Config;
//!
//! init_tracing(&Config {
//!     trace_level: Some("debug".to_string()),
//!     ..Default::default()
//! });
//! tracing::debug!("tracing is now active");
//! ```

mod file_writer;
mod init;
mod otlp;
mod tracer;

pub use init::{init_tracing, trace_file_path};

/// `service.name` resource attribute and instrumentation scope name.
pub const SERVICE_NAME: &str = "notepane";

/// File name of the trace output inside the plugin data directory.
pub const TRACE_FILE: &str = "notepane-otlp.json";
