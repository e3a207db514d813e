//! # flodvakt-enrichment
//!
//! Optional third-party enrichment of rule-based classifications. An
//! `Enricher` may override a verdict with a higher-confidence judgment;
//! every failure path fails open to the already-computed local result.
//! The engine imposes the call timeout, so adapters can block on network
//! I/O without holding up the detection path.

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use flodvakt_core::classify::{AnomalyType, ClassifiedFlow, EnrichmentVerdict};

/// Failures from an enrichment adapter. All of them are logged and
/// swallowed by the caller; none may disturb the local classification.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("Enrichment call timed out")]
    Timeout,

    #[error("Enrichment transport error: {0}")]
    Transport(String),

    #[error("Enrichment response malformed: {0}")]
    Parse(String),

    #[error("Enrichment adapter disabled")]
    Disabled,
}

/// A third-party analyzer consulted after rule-based classification.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Produces an independent verdict for an already-classified flow.
    async fn enrich(&self, classified: &ClassifiedFlow) -> Result<EnrichmentVerdict, EnrichmentError>;
}

/// Applies an enrichment verdict to a local classification.
///
/// The override only lands when the adapter reports an anomaly and either
/// the local result was benign or the adapter is more confident than the
/// local probability. Anything else leaves the classification untouched
/// apart from recording the verdict.
pub fn apply_verdict(mut classified: ClassifiedFlow, verdict: EnrichmentVerdict) -> ClassifiedFlow {
    let overrides = verdict.anomaly_detected
        && (!classified.is_anomaly || verdict.confidence > classified.probability);

    if overrides {
        info!(
            confidence = verdict.confidence,
            anomaly_type = ?verdict.anomaly_type,
            "enrichment override applied"
        );
        classified.is_anomaly = true;
        classified.probability = verdict.confidence;
        classified.anomaly_type = verdict.anomaly_type.or(classified.anomaly_type);
        if let Some(description) = &verdict.description {
            classified.description = Some(description.clone());
        }
        classified.enrichment = Some(verdict);
    }
    classified
}

/// Verdict builder for adapters that only fill the common fields.
pub fn verdict(
    anomaly_detected: bool,
    confidence: f64,
    anomaly_type: Option<AnomalyType>,
) -> EnrichmentVerdict {
    EnrichmentVerdict {
        anomaly_detected,
        confidence,
        anomaly_type,
        description: None,
        severity: None,
        recommended_action: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use flodvakt_core::features::extract_features;
    use flodvakt_core::flow::{FlowRecord, Protocol};

    fn classified(is_anomaly: bool, probability: f64) -> ClassifiedFlow {
        let flow = FlowRecord {
            source_ip: "10.0.0.5".parse().unwrap(),
            dest_ip: "10.0.0.1".parse().unwrap(),
            source_port: 50000,
            dest_port: 80,
            protocol: Protocol::Tcp,
            byte_count: 1000,
            packet_count: 10,
            flow_duration_ms: 1000,
            observed_at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
            device_id: 1,
        };
        let features = extract_features(&flow);
        ClassifiedFlow {
            flow,
            features,
            is_anomaly,
            probability,
            anomaly_type: is_anomaly.then_some(AnomalyType::DosAttack),
            description: is_anomaly.then(|| "local description".into()),
            enrichment: None,
        }
    }

    #[test]
    fn benign_local_result_is_overridden() {
        let out = apply_verdict(
            classified(false, 0.2),
            verdict(true, 0.85, Some(AnomalyType::PortScan)),
        );
        assert!(out.is_anomaly);
        assert_eq!(out.probability, 0.85);
        assert_eq!(out.anomaly_type, Some(AnomalyType::PortScan));
        assert!(out.enrichment.is_some());
    }

    #[test]
    fn higher_confidence_beats_local_anomaly() {
        let out = apply_verdict(
            classified(true, 0.8),
            verdict(true, 0.95, Some(AnomalyType::BruteForce)),
        );
        assert_eq!(out.probability, 0.95);
        assert_eq!(out.anomaly_type, Some(AnomalyType::BruteForce));
    }

    #[test]
    fn lower_confidence_leaves_local_anomaly_alone() {
        let out = apply_verdict(
            classified(true, 0.9),
            verdict(true, 0.5, Some(AnomalyType::PortScan)),
        );
        assert_eq!(out.probability, 0.9);
        assert_eq!(out.anomaly_type, Some(AnomalyType::DosAttack));
        assert!(out.enrichment.is_none());
    }

    #[test]
    fn benign_verdict_never_overrides() {
        let out = apply_verdict(classified(true, 0.8), verdict(false, 0.99, None));
        assert!(out.is_anomaly);
        assert_eq!(out.probability, 0.8);
        assert!(out.enrichment.is_none());
    }

    #[test]
    fn missing_anomaly_type_keeps_local_type() {
        let out = apply_verdict(classified(true, 0.8), verdict(true, 0.9, None));
        assert_eq!(out.anomaly_type, Some(AnomalyType::DosAttack));
        assert_eq!(out.description.as_deref(), Some("local description"));
    }
}
