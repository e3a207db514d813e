//! Detector thresholds, windows, and weights.
//!
//! Defaults reproduce the tuned rule constants; every value can be
//! overridden at construction time without touching detection logic. The
//! probability weights have no documented derivation and are preserved
//! as-is, so recalibrate deliberately or not at all.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Configuration for the full detector triad.
#[derive(Default, Debug, Serialize, Deserialize, Validate, Clone)]
pub struct DetectionConfig {
    /// Port scan detector parameters.
    #[validate(nested)]
    pub port_scan: PortScanConfig,

    /// Flood / DoS detector parameters.
    #[validate(nested)]
    pub flood: FloodConfig,

    /// Brute force detector parameters.
    #[validate(nested)]
    pub brute_force: BruteForceConfig,
}

/// Port scan detection thresholds. Keyed per `(source, destination)` pair.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct PortScanConfig {
    /// Trailing window in milliseconds.
    #[validate(range(min = 1))]
    #[serde(default = "default_scan_window_ms")]
    pub window_ms: u64,

    /// Distinct destination ports within the window that flag a scan.
    #[validate(range(min = 1))]
    #[serde(default = "default_unique_ports")]
    pub unique_ports: u32,

    /// Multiplier applied to the port ratio; caps probability below 1.0
    /// to leave headroom for enrichment overrides.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_scan_cap")]
    pub probability_cap: f64,

    /// Minimum probability before the verdict flips to anomalous.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_scan_min_probability")]
    pub min_probability: f64,
}

fn default_scan_window_ms() -> u64 {
    60_000
}
fn default_unique_ports() -> u32 {
    15
}
fn default_scan_cap() -> f64 {
    0.9
}
fn default_scan_min_probability() -> f64 {
    0.7
}

impl Default for PortScanConfig {
    fn default() -> Self {
        Self {
            window_ms: default_scan_window_ms(),
            unique_ports: default_unique_ports(),
            probability_cap: default_scan_cap(),
            min_probability: default_scan_min_probability(),
        }
    }
}

/// Flood detection thresholds. Keyed per `(source, destination)` pair.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct FloodConfig {
    /// Trailing window in milliseconds.
    #[validate(range(min = 1))]
    #[serde(default = "default_flood_window_ms")]
    pub window_ms: u64,

    /// Packets per second that saturate the packet-rate term.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_packet_rate")]
    pub packet_rate: f64,

    /// Bytes per second that saturate the byte-rate term.
    #[validate(range(min = 1.0))]
    #[serde(default = "default_byte_rate")]
    pub byte_rate: f64,

    /// Weight of the packet-rate term.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_packet_weight")]
    pub packet_weight: f64,

    /// Weight of the byte-rate term.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_byte_weight")]
    pub byte_weight: f64,

    /// Minimum probability before the verdict flips to anomalous.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_flood_min_probability")]
    pub min_probability: f64,
}

fn default_flood_window_ms() -> u64 {
    10_000
}
fn default_packet_rate() -> f64 {
    100.0
}
fn default_byte_rate() -> f64 {
    10_000.0
}
fn default_packet_weight() -> f64 {
    0.7
}
fn default_byte_weight() -> f64 {
    0.3
}
fn default_flood_min_probability() -> f64 {
    0.8
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            window_ms: default_flood_window_ms(),
            packet_rate: default_packet_rate(),
            byte_rate: default_byte_rate(),
            packet_weight: default_packet_weight(),
            byte_weight: default_byte_weight(),
            min_probability: default_flood_min_probability(),
        }
    }
}

/// Brute force detection thresholds. Keyed per source, sub-keyed by
/// destination port; only evaluated for the sensitive ports listed here.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct BruteForceConfig {
    /// Trailing window in milliseconds.
    #[validate(range(min = 1))]
    #[serde(default = "default_brute_window_ms")]
    pub window_ms: u64,

    /// Connection attempts within the window that flag an attack.
    #[validate(range(min = 1))]
    #[serde(default = "default_connection_count")]
    pub connection_count: u32,

    /// Service ports commonly targeted by credential guessing.
    #[validate(custom(function = validation::validate_port_set))]
    #[serde(default = "default_sensitive_ports")]
    pub sensitive_ports: Vec<u16>,

    /// Weight of the connection-ratio term.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_ratio_weight")]
    pub ratio_weight: f64,

    /// Fixed bonus added for traffic to a sensitive port.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_sensitivity_bonus")]
    pub sensitivity_bonus: f64,

    /// Minimum probability before the verdict flips to anomalous.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_brute_min_probability")]
    pub min_probability: f64,
}

fn default_brute_window_ms() -> u64 {
    30_000
}
fn default_connection_count() -> u32 {
    10
}
fn default_sensitive_ports() -> Vec<u16> {
    vec![22, 23, 3389, 5900, 8291]
}
fn default_ratio_weight() -> f64 {
    0.8
}
fn default_sensitivity_bonus() -> f64 {
    0.2
}
fn default_brute_min_probability() -> f64 {
    0.7
}

impl Default for BruteForceConfig {
    fn default() -> Self {
        Self {
            window_ms: default_brute_window_ms(),
            connection_count: default_connection_count(),
            sensitive_ports: default_sensitive_ports(),
            ratio_weight: default_ratio_weight(),
            sensitivity_bonus: default_sensitivity_bonus(),
            min_probability: default_brute_min_probability(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn valid_default_detection_config() {
        let config = DetectionConfig::default();
        config.validate().expect("Default config should be valid");
    }

    #[test]
    fn zero_window_is_rejected() {
        let mut config = DetectionConfig::default();
        config.port_scan.window_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_weight_is_rejected() {
        let mut config = DetectionConfig::default();
        config.flood.packet_weight = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_sensitive_ports_is_rejected() {
        let mut config = DetectionConfig::default();
        config.brute_force.sensitive_ports.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_sensitive_ports_cover_remote_access() {
        let config = BruteForceConfig::default();
        for port in [22, 23, 3389, 5900, 8291] {
            assert!(config.sensitive_ports.contains(&port));
        }
    }
}
