//! Synthetic flow generation.
//!
//! Produces the traffic shapes the detectors are tuned for: a port sweep
//! across 100 ports, a packet flood at a web port, repeated attempts at
//! SSH, and benign background flows. Seeded, so every run of a scenario
//! replays identically.

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use flodvakt_core::flow::{FlowRecord, Protocol};

/// Seeded generator of synthetic flow records.
pub struct FlowGenerator {
    rng: SmallRng,
    device_id: i64,
}

impl FlowGenerator {
    pub fn new(seed: u64, device_id: i64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            device_id,
        }
    }

    /// A sweep over destination ports 1..=100, short flows spaced 10 ms
    /// apart.
    pub fn port_scan(
        &mut self,
        source: IpAddr,
        dest: IpAddr,
        start: DateTime<Utc>,
    ) -> Vec<FlowRecord> {
        (1..=100u16)
            .map(|port| FlowRecord {
                source_ip: source,
                dest_ip: dest,
                source_port: 50_000 + self.rng.random_range(0..10_000),
                dest_port: port,
                protocol: if self.rng.random_bool(0.5) {
                    Protocol::Tcp
                } else {
                    Protocol::Udp
                },
                byte_count: 64 + self.rng.random_range(0..100),
                packet_count: 1 + self.rng.random_range(0..3),
                flow_duration_ms: 100 + self.rng.random_range(0..500),
                observed_at: start + Duration::milliseconds(i64::from(port) * 10),
                device_id: self.device_id,
            })
            .collect()
    }

    /// Fifty heavy flows at port 80, spaced 20 ms apart.
    pub fn flood(&mut self, source: IpAddr, dest: IpAddr, start: DateTime<Utc>) -> Vec<FlowRecord> {
        (0..50i64)
            .map(|i| FlowRecord {
                source_ip: source,
                dest_ip: dest,
                source_port: 50_000 + self.rng.random_range(0..100),
                dest_port: 80,
                protocol: Protocol::Tcp,
                byte_count: 1_000 + self.rng.random_range(0..1_000),
                packet_count: 100 + self.rng.random_range(0..900),
                flow_duration_ms: 100 + self.rng.random_range(0..200),
                observed_at: start + Duration::milliseconds(i * 20),
                device_id: self.device_id,
            })
            .collect()
    }

    /// Thirty similar-sized connection attempts at SSH, one per second.
    pub fn brute_force(
        &mut self,
        source: IpAddr,
        dest: IpAddr,
        start: DateTime<Utc>,
    ) -> Vec<FlowRecord> {
        (0..30i64)
            .map(|i| FlowRecord {
                source_ip: source,
                dest_ip: dest,
                source_port: 50_000 + self.rng.random_range(0..1_000),
                dest_port: 22,
                protocol: Protocol::Tcp,
                byte_count: 200 + self.rng.random_range(0..100),
                packet_count: 5 + self.rng.random_range(0..5),
                flow_duration_ms: 1_000 + self.rng.random_range(0..1_000),
                observed_at: start + Duration::seconds(i),
                device_id: self.device_id,
            })
            .collect()
    }

    /// A single benign flow to a high port.
    pub fn normal(&mut self, source: IpAddr, dest: IpAddr, at: DateTime<Utc>) -> FlowRecord {
        FlowRecord {
            source_ip: source,
            dest_ip: dest,
            source_port: 50_000 + self.rng.random_range(0..10_000),
            dest_port: 443,
            protocol: Protocol::Tcp,
            byte_count: 500 + self.rng.random_range(0..2_000),
            packet_count: 5 + self.rng.random_range(0..20),
            flow_duration_ms: 500 + self.rng.random_range(0..2_000),
            observed_at: at,
            device_id: self.device_id,
        }
    }
}
