//! Detection results and the arbitrated flow classification.

use serde::{Deserialize, Serialize};

use crate::features::FeatureVector;
use crate::flow::FlowRecord;

/// The rule-based detectors, in arbitration tie-break order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DetectorKind {
    PortScan,
    Flood,
    BruteForce,
}

impl DetectorKind {
    pub fn anomaly_type(self) -> AnomalyType {
        match self {
            DetectorKind::PortScan => AnomalyType::PortScan,
            DetectorKind::Flood => AnomalyType::DosAttack,
            DetectorKind::BruteForce => AnomalyType::BruteForce,
        }
    }
}

/// Anomaly classes reported to downstream consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyType {
    #[serde(rename = "PORT_SCAN")]
    PortScan,
    #[serde(rename = "DOS_ATTACK")]
    DosAttack,
    #[serde(rename = "BRUTEFORCE")]
    BruteForce,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyType::PortScan => "PORT_SCAN",
            AnomalyType::DosAttack => "DOS_ATTACK",
            AnomalyType::BruteForce => "BRUTEFORCE",
        }
    }
}

impl std::fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detector's verdict for one flow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub detector: DetectorKind,
    pub is_anomaly: bool,
    /// Score in `[0, 1]`.
    pub probability: f64,
}

impl DetectionResult {
    /// A benign result with zero score, used when a detector does not
    /// apply to the flow (e.g. brute force on a non-sensitive port).
    pub fn benign(detector: DetectorKind) -> Self {
        Self {
            detector,
            is_anomaly: false,
            probability: 0.0,
        }
    }
}

/// Verdict from the optional third-party enrichment adapter, attached to a
/// classification when an override was applied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentVerdict {
    pub anomaly_detected: bool,
    /// Adapter confidence in `[0, 1]`, comparable to detector probability.
    pub confidence: f64,
    pub anomaly_type: Option<AnomalyType>,
    pub description: Option<String>,
    pub severity: Option<String>,
    pub recommended_action: Option<String>,
}

/// Arbitration output for one flow: the winning verdict plus the inputs it
/// was computed from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedFlow {
    pub flow: FlowRecord,
    pub features: FeatureVector,
    pub is_anomaly: bool,
    pub probability: f64,
    pub anomaly_type: Option<AnomalyType>,
    pub description: Option<String>,
    /// Present only when an enrichment override was applied.
    pub enrichment: Option<EnrichmentVerdict>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anomaly_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&AnomalyType::PortScan).unwrap(),
            "\"PORT_SCAN\""
        );
        assert_eq!(
            serde_json::to_string(&AnomalyType::DosAttack).unwrap(),
            "\"DOS_ATTACK\""
        );
        assert_eq!(
            serde_json::to_string(&AnomalyType::BruteForce).unwrap(),
            "\"BRUTEFORCE\""
        );
    }

    #[test]
    fn tie_break_order_is_fixed() {
        assert!(DetectorKind::PortScan < DetectorKind::Flood);
        assert!(DetectorKind::Flood < DetectorKind::BruteForce);
    }
}
