//! The rule engine: one `detect` call per incoming flow.
//!
//! Each call sweeps all three state stores to the trailing windows,
//! extracts features, runs the detector triad, and arbitrates a single
//! verdict. The whole sequence is synchronous and performs no I/O;
//! callers that process flows concurrently serialize calls per engine
//! (one lock around the full sweep-detect-update sequence is fully
//! correct) since detectors share per-key state.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};
use validator::Validate;

use flodvakt_config::{ConfigError, DetectionConfig};
use flodvakt_core::classify::ClassifiedFlow;
use flodvakt_core::features::extract_features;
use flodvakt_core::flow::FlowRecord;

use crate::arbitration::{arbitrate, describe};
use crate::brute_force::BruteForceDetector;
use crate::flood::FloodDetector;
use crate::port_scan::PortScanDetector;

/// The detector triad plus arbitration behind a single entry point.
#[derive(Debug)]
pub struct RuleEngine {
    port_scan: PortScanDetector,
    flood: FloodDetector,
    brute_force: BruteForceDetector,
}

impl RuleEngine {
    /// Builds the engine, failing fast on invalid static configuration
    /// (non-positive windows, weights outside the unit interval).
    pub fn new(config: DetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            port_scan: PortScanDetector::new(config.port_scan),
            flood: FloodDetector::new(config.flood),
            brute_force: BruteForceDetector::new(config.brute_force),
        })
    }

    /// Classifies one flow against the current windowed state.
    ///
    /// `now` anchors the trailing windows; passing `flow.observed_at`
    /// makes replayed traffic deterministic, and tests inject fixed
    /// instants to pin window boundaries.
    pub fn detect(&mut self, flow: &FlowRecord, now: DateTime<Utc>) -> ClassifiedFlow {
        // One synchronous sweep across all stores before any detector
        // scores the flow, so every detector sees the same window.
        self.port_scan.sweep(now);
        self.flood.sweep(now);
        self.brute_force.sweep(now);

        let features = extract_features(flow);

        // Order fixes the arbitration tie-break priority.
        let results = [
            self.port_scan.observe(flow, now),
            self.flood.observe(flow, now),
            self.brute_force.observe(flow, now),
        ];
        trace!(?results, endpoints = %flow.endpoints(), "detector scores");

        let winner = arbitrate(&results);
        if winner.is_anomaly {
            debug!(
                detector = ?winner.detector,
                probability = winner.probability,
                endpoints = %flow.endpoints(),
                "anomalous flow"
            );
        }

        ClassifiedFlow {
            flow: flow.clone(),
            features,
            is_anomaly: winner.is_anomaly,
            probability: winner.probability,
            anomaly_type: winner.is_anomaly.then(|| winner.detector.anomaly_type()),
            description: winner
                .is_anomaly
                .then(|| describe(winner.detector).to_string()),
            enrichment: None,
        }
    }

    /// Total keys tracked across all three stores; bounded by the active
    /// traffic within the windows.
    pub fn tracked_keys(&self) -> usize {
        self.port_scan.tracked_keys() + self.flood.tracked_keys() + self.brute_force.tracked_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use flodvakt_core::classify::AnomalyType;
    use flodvakt_core::flow::Protocol;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn flow(
        src: &str,
        dst: &str,
        dest_port: u16,
        bytes: u64,
        packets: u64,
        observed_at: DateTime<Utc>,
    ) -> FlowRecord {
        FlowRecord {
            source_ip: src.parse().unwrap(),
            dest_ip: dst.parse().unwrap(),
            source_port: 50000,
            dest_port,
            protocol: Protocol::Tcp,
            byte_count: bytes,
            packet_count: packets,
            flow_duration_ms: 200,
            observed_at,
            device_id: 1,
        }
    }

    #[test]
    fn invalid_config_fails_construction() {
        let mut config = DetectionConfig::default();
        config.flood.window_ms = 0;
        assert!(RuleEngine::new(config).is_err());
    }

    #[test]
    fn benign_flow_classifies_normal() {
        let mut engine = RuleEngine::new(DetectionConfig::default()).unwrap();
        let now = base_time();
        let classified = engine.detect(&flow("10.0.0.2", "10.0.0.1", 443, 1000, 10, now), now);
        assert!(!classified.is_anomaly);
        assert!(classified.anomaly_type.is_none());
        assert!(classified.description.is_none());
        assert!(classified.enrichment.is_none());
    }

    #[test]
    fn port_scan_wins_over_brute_force_on_sensitive_ports() {
        // Scanning through sensitive ports scores both detectors; the
        // scan's higher probability must win the arbitration.
        let mut engine = RuleEngine::new(DetectionConfig::default()).unwrap();
        let start = base_time();
        let mut last = None;
        for (i, port) in (10u16..=29).enumerate() {
            let now = start + Duration::milliseconds(i as i64 * 10);
            last = Some(engine.detect(&flow("10.0.0.5", "10.0.0.1", port, 64, 1, now), now));
        }
        let classified = last.unwrap();
        assert!(classified.is_anomaly);
        assert_eq!(classified.anomaly_type, Some(AnomalyType::PortScan));
    }

    #[test]
    fn detect_never_panics_on_degenerate_input() {
        let mut engine = RuleEngine::new(DetectionConfig::default()).unwrap();
        let now = base_time();
        let degenerate = flow("10.0.0.2", "10.0.0.1", 0, 0, 0, now);
        let classified = engine.detect(&degenerate, now);
        assert!(!classified.is_anomaly);
        assert!(classified.probability.is_finite());
    }

    #[test]
    fn state_is_bounded_by_eviction() {
        let mut engine = RuleEngine::new(DetectionConfig::default()).unwrap();
        let start = base_time();
        for i in 0..100i64 {
            let src = format!("10.1.{}.{}", i / 250, (i % 250) + 1);
            let now = start + Duration::milliseconds(i);
            engine.detect(&flow(&src, "10.0.0.1", 80, 100, 2, now), now);
        }
        assert!(engine.tracked_keys() > 0);

        // One flow far in the future sweeps everything stale away.
        let later = start + Duration::milliseconds(120_000);
        engine.detect(&flow("10.9.9.9", "10.0.0.1", 80, 100, 2, later), later);
        assert_eq!(engine.tracked_keys(), 2);
    }
}
