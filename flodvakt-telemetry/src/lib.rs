//! # flodvakt-telemetry
//!
//! Observability for the flow pipeline: structured logging via `tracing`
//! and a Prometheus metrics recorder.

pub mod logging;
pub mod metrics;

pub use logging::EventLogger;
pub use metrics::MetricsRecorder;
