//! Observability setup for Docent: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
