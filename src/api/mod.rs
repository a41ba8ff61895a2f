pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::metrics::MonitorMetrics;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<MonitorMetrics>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(metrics: Arc<MonitorMetrics>) -> Self {
        Self {
            metrics,
            started_at: Instant::now(),
        }
    }
}
