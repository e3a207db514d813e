//! # flodvakt-core
//!
//! Shared types for the flow anomaly-detection pipeline: the normalized
//! `FlowRecord` supplied by upstream collectors, the fixed-schema
//! `FeatureVector` derived from it, detection/classification results, and
//! the `Alert` handed to downstream sinks.
//!
//! ### Key submodules:
//! - `flow`: immutable flow records and protocol tagging
//! - `features`: pure feature extraction with a fixed CICIDS-style schema
//! - `classify`: per-detector results and the arbitrated classification
//! - `alert`: alert values emitted for anomalous flows

pub mod alert;
pub mod classify;
pub mod features;
pub mod flow;

pub mod prelude {
    pub use crate::alert::{Alert, Severity};
    pub use crate::classify::{
        AnomalyType, ClassifiedFlow, DetectionResult, DetectorKind, EnrichmentVerdict,
    };
    pub use crate::features::{extract_features, FeatureVector};
    pub use crate::flow::{FlowRecord, Protocol};
}
