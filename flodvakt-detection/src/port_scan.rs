//! Port scan detection.
//!
//! Counts distinct destination ports per `(source, destination)` pair
//! within a trailing window. The probability is the port ratio scaled by a
//! cap below 1.0, which reserves headroom for enrichment overrides.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use flodvakt_config::PortScanConfig;
use flodvakt_core::classify::{DetectionResult, DetectorKind};
use flodvakt_core::flow::FlowRecord;

use crate::window::{retain_recent, PairKey};

#[derive(Debug, Default)]
struct ScanState {
    ports: HashSet<u16>,
    timestamps: Vec<DateTime<Utc>>,
}

/// Tracks distinct-port activity per endpoint pair.
#[derive(Debug)]
pub struct PortScanDetector {
    config: PortScanConfig,
    state: HashMap<PairKey, ScanState>,
}

impl PortScanDetector {
    pub fn new(config: PortScanConfig) -> Self {
        Self {
            config,
            state: HashMap::new(),
        }
    }

    /// Evicts keys with no observations left in the trailing window.
    pub fn sweep(&mut self, now: DateTime<Utc>) {
        let window_ms = self.config.window_ms;
        self.state.retain(|_, state| {
            retain_recent(&mut state.timestamps, now, window_ms);
            !state.timestamps.is_empty()
        });
    }

    /// Records the flow and scores the pair's distinct-port count.
    pub fn observe(&mut self, flow: &FlowRecord, now: DateTime<Utc>) -> DetectionResult {
        let state = self
            .state
            .entry((flow.source_ip, flow.dest_ip))
            .or_default();
        state.ports.insert(flow.dest_port);
        state.timestamps.push(now);

        let unique_ports = state.ports.len() as u32;
        let port_ratio = (f64::from(unique_ports) / f64::from(self.config.unique_ports)).min(1.0);
        let probability = port_ratio * self.config.probability_cap;

        DetectionResult {
            detector: DetectorKind::PortScan,
            is_anomaly: unique_ports >= self.config.unique_ports
                && probability >= self.config.min_probability,
            probability,
        }
    }

    /// Number of endpoint pairs currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.state.len()
    }
}
