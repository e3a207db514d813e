//! # flodvakt-engine
//!
//! The per-flow pipeline: rule-based detection behind a single lock,
//! optional enrichment outside the critical section, and fire-and-forget
//! emission to the downstream sinks.

mod error;
mod runtime;

pub use error::EngineError;
pub use runtime::DetectionRuntime;
