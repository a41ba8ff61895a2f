//! Tests for the metrics exposition router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use churn_inference_monitor::api::{build_router, AppState};
use churn_inference_monitor::{MonitorMetrics, PredictionResult};
use std::sync::Arc;
use tower::util::ServiceExt;

fn state_fixture() -> (Arc<MonitorMetrics>, AppState) {
    let metrics = Arc::new(MonitorMetrics::new().unwrap());
    let state = AppState::new(metrics.clone());
    (metrics, state)
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn metrics_endpoint_serves_exposition_text() {
    let (metrics, state) = state_fixture();
    metrics.observe_attempt(0.015);
    metrics.record_success(&PredictionResult {
        label: 1,
        confidence: 0.91,
        drift_magnitude: 0.02,
        request_bytes: 180,
    });

    let response = build_router(state)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; version=0.0.4"
    );

    let body = body_string(response).await;
    assert!(body.contains("churn_monitor_requests_total 1"));
    assert!(body.contains("churn_monitor_success_total 1"));
    assert!(body.contains("churn_monitor_simulated_confidence_score"));
    assert!(body.contains("# TYPE churn_monitor_request_latency_seconds histogram"));
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let (_metrics, state) = state_fixture();

    let response = build_router(state)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\"status\":\"healthy\""));
}

#[tokio::test]
async fn scrape_between_updates_sees_consistent_single_metrics() {
    let (metrics, state) = state_fixture();
    let router = build_router(state);

    // Interleave updates and scrapes; each scraped counter value must be a
    // whole number (no torn reads), though cross-metric skew is accepted.
    for i in 0..5 {
        metrics.observe_attempt(0.001);
        metrics.record_failure();

        let response = router
            .clone()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_string(response).await;
        let expected = format!("churn_monitor_requests_total {}", i + 1);
        assert!(body.contains(&expected), "missing {}", expected);
    }
}
