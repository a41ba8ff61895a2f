//! Inference traffic monitor for a deployed churn model.
//!
//! Replays rows from the cleaned churn dataset against an MLflow-style
//! `/invocations` endpoint on a fixed tick, and exposes request, latency,
//! drift and host-utilization metrics for a Prometheus scraper.

pub mod api;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod traffic;

pub use client::{PredictionClient, PredictionResult};
pub use config::Config;
pub use dataset::ReferenceDataset;
pub use error::{MonitorError, Result};
pub use metrics::MonitorMetrics;
pub use traffic::TrafficGenerator;
