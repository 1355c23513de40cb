//! Observability setup for the Webtoys relay: tracing subscriber
//! initialization with optional OpenTelemetry span export.

pub mod tracing_setup;
