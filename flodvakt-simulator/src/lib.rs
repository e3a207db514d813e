//! # flodvakt-simulator
//!
//! Deterministic synthetic traffic for exercising the detection pipeline:
//! a seedable virtual clock and generators for the attack patterns the
//! rule engine detects (port scans, floods, brute force) plus benign
//! background traffic.

pub mod generator;
pub mod virtual_clock;

pub use generator::FlowGenerator;
pub use virtual_clock::VirtualClock;
