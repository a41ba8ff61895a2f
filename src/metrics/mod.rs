//! Prometheus metrics for the traffic monitor.
//!
//! All instruments live in one owned registry constructed at startup and
//! shared by reference between the traffic loop and the scrape handler.
//! Counters only ever increase, gauges hold the last observation, and the
//! latency histogram receives exactly one observation per completed
//! attempt, successful or failed, so `requests_total` always equals
//! `success_total + failure_total` between iterations.
//!
//! Confidence and drift are placeholder telemetry (see the client module);
//! their gauges are segregated under the `simulated` subsystem so a
//! dashboard cannot mistake them for model output.

mod system;

pub use system::{SystemSampler, SystemUtilization};

use crate::client::PredictionResult;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

const NAMESPACE: &str = "churn_monitor";

/// Buckets sized for a local model server answering in milliseconds, with
/// headroom for a cold start or a stalled connection.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Central metrics registry for the monitor
pub struct MonitorMetrics {
    registry: Registry,

    cpu_usage: Gauge,
    memory_usage: Gauge,

    requests_total: Counter,
    success_total: Counter,
    failure_total: Counter,
    latency_seconds: Histogram,

    prediction_value: Gauge,
    input_payload_bytes: Gauge,

    confidence_score: Gauge,
    drift_magnitude: Gauge,
}

impl MonitorMetrics {
    /// Create the registry and register every instrument once.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let cpu_usage = Gauge::with_opts(
            Opts::new("system_cpu_usage_percent", "Current CPU usage in percent")
                .namespace(NAMESPACE),
        )?;

        let memory_usage = Gauge::with_opts(
            Opts::new("system_memory_usage_percent", "Current RAM usage in percent")
                .namespace(NAMESPACE),
        )?;

        let requests_total = Counter::with_opts(
            Opts::new("requests_total", "Total prediction requests attempted").namespace(NAMESPACE),
        )?;

        let success_total = Counter::with_opts(
            Opts::new("success_total", "Total successful prediction requests")
                .namespace(NAMESPACE),
        )?;

        let failure_total = Counter::with_opts(
            Opts::new("failure_total", "Total failed prediction requests").namespace(NAMESPACE),
        )?;

        let latency_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "request_latency_seconds",
                "Prediction request latency in seconds",
            )
            .namespace(NAMESPACE)
            .buckets(LATENCY_BUCKETS.to_vec()),
        )?;

        let prediction_value = Gauge::with_opts(
            Opts::new("model_prediction_value", "Last predicted class label (0 or 1)")
                .namespace(NAMESPACE),
        )?;

        let input_payload_bytes = Gauge::with_opts(
            Opts::new(
                "input_payload_bytes",
                "Size of the last serialized request payload",
            )
            .namespace(NAMESPACE),
        )?;

        let confidence_score = Gauge::with_opts(
            Opts::new("confidence_score", "Simulated confidence score of the last prediction")
                .namespace(NAMESPACE)
                .subsystem("simulated"),
        )?;

        let drift_magnitude = Gauge::with_opts(
            Opts::new("drift_magnitude", "Simulated data drift magnitude")
                .namespace(NAMESPACE)
                .subsystem("simulated"),
        )?;

        registry.register(Box::new(cpu_usage.clone()))?;
        registry.register(Box::new(memory_usage.clone()))?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(success_total.clone()))?;
        registry.register(Box::new(failure_total.clone()))?;
        registry.register(Box::new(latency_seconds.clone()))?;
        registry.register(Box::new(prediction_value.clone()))?;
        registry.register(Box::new(input_payload_bytes.clone()))?;
        registry.register(Box::new(confidence_score.clone()))?;
        registry.register(Box::new(drift_magnitude.clone()))?;

        Ok(Self {
            registry,
            cpu_usage,
            memory_usage,
            requests_total,
            success_total,
            failure_total,
            latency_seconds,
            prediction_value,
            input_payload_bytes,
            confidence_score,
            drift_magnitude,
        })
    }

    /// Overwrite the system utilization gauges.
    pub fn set_system_utilization(&self, utilization: &SystemUtilization) {
        self.cpu_usage.set(utilization.cpu_percent);
        self.memory_usage.set(utilization.memory_percent);
    }

    /// Record one completed attempt: latency observation plus the request
    /// counter. Called exactly once per iteration, before the outcome
    /// counters.
    pub fn observe_attempt(&self, latency_secs: f64) {
        self.latency_seconds.observe(latency_secs);
        self.requests_total.inc();
    }

    /// Record a successful prediction and refresh the per-prediction gauges.
    pub fn record_success(&self, prediction: &PredictionResult) {
        self.success_total.inc();
        self.prediction_value.set(prediction.label as f64);
        self.input_payload_bytes.set(prediction.request_bytes as f64);
        self.confidence_score.set(prediction.confidence);
        self.drift_magnitude.set(prediction.drift_magnitude);
    }

    /// Record a failed prediction attempt.
    pub fn record_failure(&self) {
        self.failure_total.inc();
    }

    pub fn requests(&self) -> f64 {
        self.requests_total.get()
    }

    pub fn successes(&self) -> f64 {
        self.success_total.get()
    }

    pub fn failures(&self) -> f64 {
        self.failure_total.get()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence_score.get()
    }

    pub fn drift(&self) -> f64 {
        self.drift_magnitude.get()
    }

    /// Export all instruments in Prometheus text exposition format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("failed to encode metrics: {}", e);
            return String::from("# error encoding metrics\n");
        }

        String::from_utf8(buffer).unwrap_or_else(|e| {
            tracing::error!("failed to convert metrics to string: {}", e);
            String::from("# error converting metrics\n")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction_fixture() -> PredictionResult {
        PredictionResult {
            label: 1,
            confidence: 0.88,
            drift_magnitude: 0.03,
            request_bytes: 256,
        }
    }

    #[test]
    fn test_registry_creation_registers_all_instruments() {
        let metrics = MonitorMetrics::new().unwrap();
        let exported = metrics.export();

        for name in [
            "churn_monitor_system_cpu_usage_percent",
            "churn_monitor_system_memory_usage_percent",
            "churn_monitor_requests_total",
            "churn_monitor_success_total",
            "churn_monitor_failure_total",
            "churn_monitor_request_latency_seconds",
            "churn_monitor_model_prediction_value",
            "churn_monitor_input_payload_bytes",
            "churn_monitor_simulated_confidence_score",
            "churn_monitor_simulated_drift_magnitude",
        ] {
            assert!(exported.contains(name), "missing {}", name);
        }
    }

    #[test]
    fn test_attempt_accounting_invariant() {
        let metrics = MonitorMetrics::new().unwrap();

        metrics.observe_attempt(0.012);
        metrics.record_success(&prediction_fixture());

        metrics.observe_attempt(0.500);
        metrics.record_failure();

        metrics.observe_attempt(0.020);
        metrics.record_failure();

        assert_eq!(metrics.requests(), 3.0);
        assert_eq!(metrics.successes(), 1.0);
        assert_eq!(metrics.failures(), 2.0);
        assert_eq!(metrics.requests(), metrics.successes() + metrics.failures());
    }

    #[test]
    fn test_success_updates_prediction_gauges() {
        let metrics = MonitorMetrics::new().unwrap();
        metrics.observe_attempt(0.008);
        metrics.record_success(&prediction_fixture());

        let exported = metrics.export();
        assert!(exported.contains("churn_monitor_model_prediction_value 1"));
        assert!(exported.contains("churn_monitor_input_payload_bytes 256"));
        assert_eq!(metrics.confidence(), 0.88);
        assert_eq!(metrics.drift(), 0.03);
    }

    #[test]
    fn test_latency_histogram_counts_every_attempt() {
        let metrics = MonitorMetrics::new().unwrap();
        metrics.observe_attempt(0.002);
        metrics.record_success(&prediction_fixture());
        metrics.observe_attempt(0.002);
        metrics.record_failure();

        let exported = metrics.export();
        assert!(exported.contains("churn_monitor_request_latency_seconds_count 2"));
    }
}
