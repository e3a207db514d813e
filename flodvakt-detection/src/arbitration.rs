//! Verdict arbitration over the detector triad.
//!
//! All three detectors score every flow; the single winner is the highest
//! probability, with ties broken by the fixed priority
//! PortScan > Flood > BruteForce so repeated runs classify identically.

use flodvakt_core::classify::{DetectionResult, DetectorKind};

/// Picks the winning result. `results` must be ordered by tie-break
/// priority; a later result only wins with a strictly higher probability.
pub fn arbitrate(results: &[DetectionResult; 3]) -> DetectionResult {
    let mut winner = results[0];
    for candidate in &results[1..] {
        if candidate.probability > winner.probability {
            winner = *candidate;
        }
    }
    winner
}

/// Human-readable description attached to an anomalous verdict.
pub fn describe(detector: DetectorKind) -> &'static str {
    match detector {
        DetectorKind::PortScan => {
            "Port scanning activity detected - multiple ports accessed within a short time window"
        }
        DetectorKind::Flood => "Possible DoS attack - high rate of packets directed at the target",
        DetectorKind::BruteForce => {
            "Possible brute force attack - repeated connection attempts to critical service"
        }
    }
}
