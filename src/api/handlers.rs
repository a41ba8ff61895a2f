use crate::api::AppState;
use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;

/// Prometheus text exposition content type (version 0.0.4)
const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Serve all registered instruments to the scraper.
pub async fn export_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)],
        state.metrics.export(),
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
