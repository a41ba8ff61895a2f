//! Shared fixtures for integration tests.

use churn_inference_monitor::config::EndpointConfig;
use churn_inference_monitor::{
    MonitorMetrics, PredictionClient, ReferenceDataset, TrafficGenerator,
};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const DATASET_CSV: &str = "tenure,monthly_charges,total_charges,Churn\n\
                               12,29.85,358.2,0\n\
                               3,70.70,212.1,1\n\
                               24,99.65,2391.6,0\n";

/// Write a small churn dataset into a temp dir and load it.
pub fn dataset_fixture() -> (TempDir, Arc<ReferenceDataset>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data_clean.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(DATASET_CSV.as_bytes()).unwrap();

    let dataset = ReferenceDataset::load(&path, dir.path(), "data_clean.csv", "Churn").unwrap();
    (dir, Arc::new(dataset))
}

/// A generator wired to `endpoint_url` with a short transport timeout.
pub fn generator_fixture(
    dataset: Arc<ReferenceDataset>,
    metrics: Arc<MonitorMetrics>,
    endpoint_url: &str,
) -> TrafficGenerator {
    let client = PredictionClient::new(&EndpointConfig {
        url: endpoint_url.to_string(),
        timeout_secs: 2,
    })
    .unwrap();

    TrafficGenerator::new(dataset, client, metrics, Duration::from_millis(10))
}
