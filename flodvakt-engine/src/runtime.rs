//! Detection runtime - coordinates the per-flow pipeline around the rule
//! engine.
//!
//! Flows may arrive concurrently from the upstream collector; one lock
//! guards the full sweep-detect-update sequence, which is fully correct
//! and bounds throughput to one detection at a time. Everything that can
//! block (enrichment, sinks) happens after the lock is released.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use flodvakt_config::FlodvaktConfig;
use flodvakt_core::alert::{Alert, Severity};
use flodvakt_core::classify::ClassifiedFlow;
use flodvakt_core::flow::FlowRecord;
use flodvakt_detection::RuleEngine;
use flodvakt_enrichment::{apply_verdict, Enricher};
use flodvakt_sinks::{device_alert_topic, AlertSink, Broadcaster, FeatureSink, LogSink, TOPIC_ALL_ALERTS};
use flodvakt_telemetry::{EventLogger, MetricsRecorder};
use opentelemetry::KeyValue;

use crate::error::EngineError;

/// Coordinates detection, enrichment, and alert emission for one device
/// fleet. Independent instances are isolated; tests construct their own.
pub struct DetectionRuntime {
    config: Arc<FlodvaktConfig>,
    engine: Mutex<RuleEngine>,
    metrics: Arc<MetricsRecorder>,
    features: Arc<dyn FeatureSink>,
    alerts: Arc<dyn AlertSink>,
    broadcaster: Arc<dyn Broadcaster>,
    enricher: Option<Arc<dyn Enricher>>,
}

impl DetectionRuntime {
    /// Builds the runtime with log-backed default sinks and no enricher.
    ///
    /// Fails fast on invalid static configuration.
    pub fn new(config: FlodvaktConfig) -> Result<Self, EngineError> {
        info!("Initializing detection runtime");
        debug!("Detection config: {:?}", config.detection);

        let engine = RuleEngine::new(config.detection.clone())?;
        let log_sink = Arc::new(LogSink);

        Ok(Self {
            config: Arc::new(config),
            engine: Mutex::new(engine),
            metrics: Arc::new(MetricsRecorder::new()),
            features: log_sink.clone(),
            alerts: log_sink.clone(),
            broadcaster: log_sink,
            enricher: None,
        })
    }

    pub fn with_feature_sink(mut self, sink: Arc<dyn FeatureSink>) -> Self {
        self.features = sink;
        self
    }

    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alerts = sink;
        self
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn Broadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn metrics(&self) -> Arc<MetricsRecorder> {
        self.metrics.clone()
    }

    /// Processes one flow anchored at its own observation time, making
    /// replayed traffic deterministic.
    pub async fn process_flow(&self, flow: FlowRecord) -> ClassifiedFlow {
        let now = flow.observed_at;
        self.process_flow_at(flow, now).await
    }

    /// Processes one flow with an explicit window anchor.
    #[instrument(skip_all, fields(device_id = flow.device_id))]
    pub async fn process_flow_at(&self, flow: FlowRecord, now: DateTime<Utc>) -> ClassifiedFlow {
        let started = Instant::now();
        let classified = {
            let mut engine = self.engine.lock();
            engine.detect(&flow, now)
        };
        self.metrics
            .detection_latency
            .observe(started.elapsed().as_nanos() as f64);
        self.metrics.inc_flows_processed();

        // Collaborator persistence; outcomes never feed back into the verdict.
        self.features
            .persist_features(&classified.flow, &classified.features)
            .await;

        let classified = self.apply_enrichment(classified).await;

        if let Some(alert) = Alert::from_classified(&classified, now) {
            self.emit_alert(alert).await;
        }

        classified
    }

    /// Consults the enricher, if any. Every failure path keeps the local
    /// classification unchanged.
    async fn apply_enrichment(&self, classified: ClassifiedFlow) -> ClassifiedFlow {
        if !self.config.enrichment.enabled {
            return classified;
        }
        let Some(enricher) = &self.enricher else {
            return classified;
        };

        let timeout = std::time::Duration::from_millis(self.config.enrichment.timeout_ms);
        match tokio::time::timeout(timeout, enricher.enrich(&classified)).await {
            Ok(Ok(verdict)) => apply_verdict(classified, verdict),
            Ok(Err(error)) => {
                warn!(%error, "enrichment failed, keeping rule-based result");
                classified
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.config.enrichment.timeout_ms,
                    "enrichment timed out, keeping rule-based result"
                );
                classified
            }
        }
    }

    async fn emit_alert(&self, alert: Alert) {
        if alert.severity < self.min_severity() {
            return;
        }

        self.metrics.inc_alerts_emitted();
        if self.config.alerts.log {
            EventLogger::log_event(
                "security_alert",
                vec![
                    KeyValue::new("device_id", alert.device_id),
                    KeyValue::new("probability", alert.probability),
                    KeyValue::new(
                        "anomaly_type",
                        alert.anomaly_type.map(|t| t.as_str()).unwrap_or("UNKNOWN"),
                    ),
                ],
            )
            .await;
        }
        self.alerts.persist_alert(&alert).await;

        if self.config.alerts.broadcast {
            let payload = json!({
                "type": "SECURITY_ALERT",
                "payload": {
                    "deviceId": alert.device_id,
                    "message": alert.message,
                    "severity": alert.severity,
                    "sourceIp": alert.source_ip,
                    "destIp": alert.dest_ip,
                    "probability": alert.probability,
                    "anomalyType": alert.anomaly_type,
                    "timestamp": alert.timestamp,
                }
            });
            self.broadcaster
                .broadcast(TOPIC_ALL_ALERTS, payload.clone())
                .await;
            self.broadcaster
                .broadcast(&device_alert_topic(alert.device_id), payload)
                .await;
        }
    }

    fn min_severity(&self) -> Severity {
        match self.config.alerts.min_severity.to_lowercase().as_str() {
            "info" => Severity::Info,
            "error" => Severity::Error,
            "critical" => Severity::Critical,
            _ => Severity::Warning,
        }
    }
}
