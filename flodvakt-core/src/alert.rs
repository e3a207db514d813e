//! Alert values emitted for anomalous flows.
//!
//! The core builds at most one `Alert` per anomalous classification and
//! performs no I/O itself; persistence, broadcast, and SIEM export belong
//! to the sink collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedFlow;

/// Alert severity, ordered from least to most urgent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Maps adapter-reported severity labels onto the alert scale.
    /// Unknown labels keep the `Error` default.
    fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "low" | "info" => Severity::Info,
            "medium" | "warning" => Severity::Warning,
            "critical" => Severity::Critical,
            _ => Severity::Error,
        }
    }
}

/// A security alert for one anomalous flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub device_id: i64,
    pub severity: Severity,
    pub message: String,
    pub source_ip: std::net::IpAddr,
    pub dest_ip: std::net::IpAddr,
    pub probability: f64,
    pub anomaly_type: Option<crate::classify::AnomalyType>,
    pub timestamp: DateTime<Utc>,
    pub acknowledged: bool,
}

impl Alert {
    /// Builds the alert for an anomalous classification. Returns `None`
    /// for benign flows so callers cannot emit spurious alerts.
    pub fn from_classified(classified: &ClassifiedFlow, timestamp: DateTime<Utc>) -> Option<Self> {
        if !classified.is_anomaly {
            return None;
        }

        let flow = &classified.flow;
        let base = format!(
            "Possible intrusion detected: {} ({})",
            flow.endpoints(),
            flow.protocol.to_string().to_uppercase()
        );
        let message = match (&classified.anomaly_type, &classified.description) {
            (Some(kind), Some(description)) => format!("{kind}: {description}"),
            (Some(kind), None) => format!("{kind}: {base}"),
            _ => base,
        };

        let severity = classified
            .enrichment
            .as_ref()
            .and_then(|verdict| verdict.severity.as_deref())
            .map(Severity::from_label)
            .unwrap_or(Severity::Error);

        Some(Self {
            device_id: flow.device_id,
            severity,
            message,
            source_ip: flow.source_ip,
            dest_ip: flow.dest_ip,
            probability: classified.probability,
            anomaly_type: classified.anomaly_type,
            timestamp,
            acknowledged: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::AnomalyType;
    use crate::features::extract_features;
    use crate::flow::{FlowRecord, Protocol};
    use chrono::TimeZone;

    fn classified(is_anomaly: bool) -> ClassifiedFlow {
        let flow = FlowRecord {
            source_ip: "203.0.113.5".parse().unwrap(),
            dest_ip: "10.0.0.1".parse().unwrap(),
            source_port: 50001,
            dest_port: 22,
            protocol: Protocol::Tcp,
            byte_count: 200,
            packet_count: 5,
            flow_duration_ms: 1000,
            observed_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            device_id: 7,
        };
        let features = extract_features(&flow);
        ClassifiedFlow {
            flow,
            features,
            is_anomaly,
            probability: if is_anomaly { 0.95 } else { 0.1 },
            anomaly_type: is_anomaly.then_some(AnomalyType::BruteForce),
            description: is_anomaly.then(|| "Possible brute force attack".to_string()),
            enrichment: None,
        }
    }

    #[test]
    fn benign_flow_produces_no_alert() {
        assert!(Alert::from_classified(&classified(false), Utc::now()).is_none());
    }

    #[test]
    fn anomalous_flow_produces_one_alert() {
        let now = Utc::now();
        let alert = Alert::from_classified(&classified(true), now).unwrap();
        assert_eq!(alert.device_id, 7);
        assert_eq!(alert.severity, Severity::Error);
        assert!(!alert.acknowledged);
        assert_eq!(alert.message, "BRUTEFORCE: Possible brute force attack");
        assert_eq!(alert.timestamp, now);
    }

    #[test]
    fn enrichment_severity_overrides_the_default() {
        let mut with_verdict = classified(true);
        with_verdict.enrichment = Some(crate::classify::EnrichmentVerdict {
            anomaly_detected: true,
            confidence: 0.95,
            anomaly_type: Some(AnomalyType::BruteForce),
            description: None,
            severity: Some("critical".into()),
            recommended_action: None,
        });
        let alert = Alert::from_classified(&with_verdict, Utc::now()).unwrap();
        assert_eq!(alert.severity, Severity::Critical);
    }

    #[test]
    fn missing_description_falls_back_to_endpoints() {
        let mut classified = classified(true);
        classified.description = None;
        let alert = Alert::from_classified(&classified, Utc::now()).unwrap();
        assert_eq!(
            alert.message,
            "BRUTEFORCE: Possible intrusion detected: 203.0.113.5:50001 -> 10.0.0.1:22 (TCP)"
        );
    }
}
