//! # Flodvakt Detection Engine
//!
//! Streaming rule-based anomaly detection over summarized network flows.
//! Three independent detectors (port scan, flood, brute force) score each
//! flow against bounded, time-windowed per-key state; arbitration picks a
//! single verdict with deterministic tie-breaking.
//!
//! ### Components:
//! - `window`: trailing-window state retention and synchronous eviction
//! - `port_scan` / `flood` / `brute_force`: the detector triad
//! - `arbitration`: winner selection over the triad's results
//! - `engine`: the `RuleEngine` exposing `detect(flow, now)`

pub mod arbitration;
pub mod brute_force;
pub mod engine;
pub mod flood;
pub mod port_scan;
pub mod window;

pub use brute_force::BruteForceDetector;
pub use engine::RuleEngine;
pub use flood::FloodDetector;
pub use port_scan::PortScanDetector;
