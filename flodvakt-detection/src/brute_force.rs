//! Brute force detection.
//!
//! Counts repeated connection attempts per source, sub-keyed by
//! destination port, but only for the configured sensitive ports. Traffic
//! to any other port always scores `{false, 0.0}`. The fixed sensitivity
//! bonus lifts scores for the ports that matter.

use std::collections::HashMap;
use std::net::IpAddr;

use chrono::{DateTime, Utc};

use flodvakt_config::BruteForceConfig;
use flodvakt_core::classify::{DetectionResult, DetectorKind};
use flodvakt_core::flow::FlowRecord;

use crate::window::retain_recent;

/// Tracks connection attempts to sensitive services per source address.
#[derive(Debug)]
pub struct BruteForceDetector {
    config: BruteForceConfig,
    state: HashMap<IpAddr, HashMap<u16, Vec<DateTime<Utc>>>>,
}

impl BruteForceDetector {
    pub fn new(config: BruteForceConfig) -> Self {
        Self {
            config,
            state: HashMap::new(),
        }
    }

    /// Evicts ports with no attempts left in the trailing window, and
    /// sources with no ports left.
    pub fn sweep(&mut self, now: DateTime<Utc>) {
        let window_ms = self.config.window_ms;
        self.state.retain(|_, ports| {
            ports.retain(|_, timestamps| {
                retain_recent(timestamps, now, window_ms);
                !timestamps.is_empty()
            });
            !ports.is_empty()
        });
    }

    /// Records the attempt (sensitive ports only) and scores the hit count.
    pub fn observe(&mut self, flow: &FlowRecord, now: DateTime<Utc>) -> DetectionResult {
        if !self.config.sensitive_ports.contains(&flow.dest_port) {
            return DetectionResult::benign(DetectorKind::BruteForce);
        }

        let timestamps = self
            .state
            .entry(flow.source_ip)
            .or_default()
            .entry(flow.dest_port)
            .or_default();
        timestamps.push(now);
        retain_recent(timestamps, now, self.config.window_ms);

        let hits = timestamps.len() as u32;
        let connection_ratio =
            (f64::from(hits) / f64::from(self.config.connection_count)).min(1.0);
        let probability = connection_ratio * self.config.ratio_weight + self.config.sensitivity_bonus;

        DetectionResult {
            detector: DetectorKind::BruteForce,
            is_anomaly: hits >= self.config.connection_count
                && probability >= self.config.min_probability,
            probability,
        }
    }

    /// Number of source addresses currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.state.len()
    }
}
