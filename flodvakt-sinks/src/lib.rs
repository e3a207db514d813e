//! # flodvakt-sinks
//!
//! Downstream boundary contracts. The detection core produces values;
//! persistence, dashboard broadcast, and SIEM export are collaborator
//! responsibilities behind these traits. All sink calls are
//! fire-and-forget from the engine's perspective: errors are logged and
//! never propagate back into the detection path.

use async_trait::async_trait;
use tracing::{info, warn};

use flodvakt_core::alert::Alert;
use flodvakt_core::features::FeatureVector;
use flodvakt_core::flow::FlowRecord;

/// Broadcast topic carrying every alert.
pub const TOPIC_ALL_ALERTS: &str = "all_alerts";

/// Broadcast topic scoped to one device.
pub fn device_alert_topic(device_id: i64) -> String {
    format!("device_alerts_{device_id}")
}

/// Persists extracted feature vectors alongside their flows.
#[async_trait]
pub trait FeatureSink: Send + Sync {
    async fn persist_features(&self, flow: &FlowRecord, features: &FeatureVector);
}

/// Persists alerts for the dashboard and SIEM exporters.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn persist_alert(&self, alert: &Alert);
}

/// Pushes payloads to subscribed dashboard clients.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, topic: &str, payload: serde_json::Value);
}

/// Default sink that writes everything to the structured log. Useful for
/// development and as the fallback when no database or socket layer is
/// wired up.
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl FeatureSink for LogSink {
    async fn persist_features(&self, flow: &FlowRecord, features: &FeatureVector) {
        info!(
            endpoints = %flow.endpoints(),
            bytes_per_second = features.bytes_per_second,
            packets_per_second = features.packets_per_second,
            "flow features extracted"
        );
    }
}

#[async_trait]
impl AlertSink for LogSink {
    async fn persist_alert(&self, alert: &Alert) {
        warn!(
            device_id = alert.device_id,
            probability = alert.probability,
            "ALERT: {}",
            alert.message
        );
    }
}

#[async_trait]
impl Broadcaster for LogSink {
    async fn broadcast(&self, topic: &str, payload: serde_json::Value) {
        info!(topic, %payload, "broadcast");
    }
}
