//! Prometheus metrics for the flow pipeline.

use prometheus::{Counter, Histogram, HistogramOpts, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: prometheus::Registry,
    pub flows_processed: prometheus::Counter,
    pub alerts_emitted: prometheus::Counter,
    pub detection_latency: prometheus::Histogram,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let flows_processed =
            Counter::new("flodvakt_flows_total", "Total classified network flows").unwrap();
        let alerts_emitted =
            Counter::new("flodvakt_alerts_total", "Total alerts emitted for anomalies").unwrap();

        let detection_latency = Histogram::with_opts(
            HistogramOpts::new(
                "flodvakt_detection_latency_ns",
                "Rule engine processing time per flow",
            )
            .buckets(vec![1_000.0, 10_000.0, 100_000.0, 1_000_000.0]),
        )
        .unwrap();

        registry.register(Box::new(flows_processed.clone())).unwrap();
        registry.register(Box::new(alerts_emitted.clone())).unwrap();
        registry
            .register(Box::new(detection_latency.clone()))
            .unwrap();

        Self {
            registry,
            flows_processed,
            alerts_emitted,
            detection_latency,
        }
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap())
    }

    pub fn inc_flows_processed(&self) {
        self.flows_processed.inc();
    }

    pub fn inc_alerts_emitted(&self) {
        self.alerts_emitted.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_appear_in_gathered_output() {
        let metrics = MetricsRecorder::new();
        metrics.inc_flows_processed();
        metrics.inc_flows_processed();
        metrics.inc_alerts_emitted();
        let output = metrics.gather_metrics().unwrap();
        assert!(output.contains("flodvakt_flows_total 2"));
        assert!(output.contains("flodvakt_alerts_total 1"));
    }
}
