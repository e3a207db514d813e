//! Flood / DoS detection.
//!
//! Accumulates packet and byte counts per `(source, destination)` pair and
//! scores the rates over the trailing window. Rates divide by the full
//! window length, so the score ramps as volume accumulates rather than
//! spiking on the first burst.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use flodvakt_config::FloodConfig;
use flodvakt_core::classify::{DetectionResult, DetectorKind};
use flodvakt_core::flow::FlowRecord;

use crate::window::{retain_recent, PairKey};

#[derive(Debug, Default)]
struct FloodState {
    packets: u64,
    bytes: u64,
    timestamps: Vec<DateTime<Utc>>,
}

/// Tracks volumetric activity per endpoint pair.
#[derive(Debug)]
pub struct FloodDetector {
    config: FloodConfig,
    state: HashMap<PairKey, FloodState>,
}

impl FloodDetector {
    pub fn new(config: FloodConfig) -> Self {
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

    /// Records the flow's volume and scores the pair's window rates.
    pub fn observe(&mut self, flow: &FlowRecord, now: DateTime<Utc>) -> DetectionResult {
        let state = self
            .state
            .entry((flow.source_ip, flow.dest_ip))
            .or_default();

        // Stale cumulative counts must never carry into a fresh window:
        // if nothing survives retention, restart from this observation.
        retain_recent(&mut state.timestamps, now, self.config.window_ms);
        if state.timestamps.is_empty() {
            state.packets = flow.packet_count;
            state.bytes = flow.byte_count;
        } else {
            state.packets += flow.packet_count;
            state.bytes += flow.byte_count;
        }
        state.timestamps.push(now);

        let window_secs = self.config.window_ms as f64 / 1000.0;
        let packet_rate = state.packets as f64 / window_secs;
        let byte_rate = state.bytes as f64 / window_secs;

        let packet_term = (packet_rate / self.config.packet_rate).min(1.0);
        let byte_term = (byte_rate / self.config.byte_rate).min(1.0);
        let probability =
            packet_term * self.config.packet_weight + byte_term * self.config.byte_weight;

        DetectionResult {
            detector: DetectorKind::Flood,
            is_anomaly: probability >= self.config.min_probability,
            probability,
        }
    }

    /// Number of endpoint pairs currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.state.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use flodvakt_core::flow::Protocol;
    use proptest::prelude::*;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    fn flow(bytes: u64, packets: u64) -> FlowRecord {
        FlowRecord {
            source_ip: "10.0.0.9".parse().unwrap(),
            dest_ip: "10.0.0.1".parse().unwrap(),
            source_port: 50000,
            dest_port: 80,
            protocol: Protocol::Tcp,
            byte_count: bytes,
            packet_count: packets,
            flow_duration_ms: 100,
            observed_at: base_time(),
            device_id: 1,
        }
    }

    #[test]
    fn sustained_volume_saturates() {
        let mut detector = FloodDetector::new(FloodConfig::default());
        let start = base_time();
        let mut last = DetectionResult::benign(DetectorKind::Flood);
        for i in 0..50i64 {
            let now = start + Duration::milliseconds(i * 20);
            detector.sweep(now);
            last = detector.observe(&flow(1000, 100), now);
        }
        // 5000 packets / 10 s and 50000 bytes / 10 s both saturate.
        assert!(last.is_anomaly);
        assert_eq!(last.probability, 1.0);
    }

    #[test]
    fn light_traffic_stays_benign() {
        let mut detector = FloodDetector::new(FloodConfig::default());
        let result = detector.observe(&flow(500, 10), base_time());
        assert!(!result.is_anomaly);
        assert!(result.probability < 0.1);
    }

    #[test]
    fn stale_counters_reset_after_gap() {
        let mut detector = FloodDetector::new(FloodConfig::default());
        let start = base_time();
        for i in 0..20i64 {
            detector.observe(&flow(10_000, 500), start + Duration::milliseconds(i * 10));
        }

        // Quiet for longer than the window, then a single small flow.
        let later = start + Duration::milliseconds(11_000);
        detector.sweep(later);
        assert_eq!(detector.tracked_keys(), 0);
        let result = detector.observe(&flow(100, 1), later);
        assert!(!result.is_anomaly);
        assert!(result.probability < 0.01);
    }

    proptest! {
        #[test]
        fn probability_is_monotonic_in_packet_volume(
            low in 0u64..5_000,
            extra in 1u64..5_000,
            bytes in 0u64..1_000_000,
        ) {
            let now = base_time();
            let mut sparse = FloodDetector::new(FloodConfig::default());
            let mut dense = FloodDetector::new(FloodConfig::default());
            let low_result = sparse.observe(&flow(bytes, low), now);
            let high_result = dense.observe(&flow(bytes, low + extra), now);
            prop_assert!(high_result.probability >= low_result.probability);
        }

        #[test]
        fn probability_is_monotonic_in_byte_volume(
            packets in 0u64..100_000,
            low in 0u64..1_000_000,
            extra in 1u64..1_000_000,
        ) {
            let now = base_time();
            let mut sparse = FloodDetector::new(FloodConfig::default());
            let mut dense = FloodDetector::new(FloodConfig::default());
            let low_result = sparse.observe(&flow(low, packets), now);
            let high_result = dense.observe(&flow(low + extra, packets), now);
            prop_assert!(high_result.probability >= low_result.probability);
        }
    }
}
