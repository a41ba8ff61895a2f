//! The traffic generation loop.
//!
//! One sequential task: every tick it samples host utilization, draws a
//! reference row, calls the prediction endpoint and records the outcome.
//! There is no queueing, no retry and no internal parallelism; a slow
//! endpoint simply delays the next tick. Failures are counted and logged;
//! nothing short of process termination stops the loop.

use crate::client::PredictionClient;
use crate::dataset::ReferenceDataset;
use crate::metrics::{MonitorMetrics, SystemSampler};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Fixed-interval driver for synthetic prediction traffic
pub struct TrafficGenerator {
    dataset: Arc<ReferenceDataset>,
    client: PredictionClient,
    metrics: Arc<MonitorMetrics>,
    sampler: SystemSampler,
    tick_interval: Duration,
}

impl TrafficGenerator {
    pub fn new(
        dataset: Arc<ReferenceDataset>,
        client: PredictionClient,
        metrics: Arc<MonitorMetrics>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            dataset,
            client,
            metrics,
            sampler: SystemSampler::new(),
            tick_interval,
        }
    }

    /// Run forever. Each iteration completes fully (success or failure)
    /// before the next tick is waited out.
    pub async fn run(mut self) {
        info!(
            interval_ms = self.tick_interval.as_millis() as u64,
            "traffic generator started"
        );

        let mut interval = tokio::time::interval(self.tick_interval);
        // An iteration longer than the period delays the next tick instead
        // of firing a burst to catch up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            self.run_iteration().await;
        }
    }

    /// Execute exactly one iteration.
    ///
    /// Order matters for the scrape-side invariant: the latency observation
    /// and request counter land before the outcome counter, so
    /// `requests_total == success_total + failure_total` holds between
    /// iterations.
    pub async fn run_iteration(&mut self) {
        let utilization = self.sampler.sample();
        self.metrics.set_system_utilization(&utilization);

        let sample = self.dataset.draw(&mut rand::thread_rng());

        let start = Instant::now();
        let outcome = self.client.predict(&sample).await;
        let latency = start.elapsed();

        self.metrics.observe_attempt(latency.as_secs_f64());

        match outcome {
            Ok(prediction) => {
                self.metrics.record_success(&prediction);
                info!(
                    latency_ms = latency.as_millis() as u64,
                    label = prediction.label,
                    payload_bytes = prediction.request_bytes,
                    "prediction request succeeded"
                );
            }
            Err(e) => {
                self.metrics.record_failure();
                warn!(error = %e, latency_ms = latency.as_millis() as u64, "prediction request failed");
            }
        }
    }
}
