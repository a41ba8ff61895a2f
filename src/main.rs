use anyhow::Context;
use churn_inference_monitor::{
    api::{build_router, AppState},
    client::PredictionClient,
    config::Config,
    dataset::ReferenceDataset,
    metrics::MonitorMetrics,
    traffic::TrafficGenerator,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first; the log level default comes from it
    let config = Config::load().context("failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "churn_inference_monitor={},tower_http=info",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("starting churn inference monitor v{}", env!("CARGO_PKG_VERSION"));

    // Load the reference dataset; this is the only fatal runtime dependency
    let dataset = ReferenceDataset::load(
        &config.traffic.dataset_path,
        std::path::Path::new("."),
        &config.traffic.discovery_file_name,
        &config.traffic.label_column,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "cannot start without the reference dataset");
        anyhow::anyhow!(e)
    })?;
    let dataset = Arc::new(dataset);

    // Metrics registry, shared between the loop and the scrape handler
    let metrics = Arc::new(MonitorMetrics::new().context("failed to register metrics")?);

    // Prediction client
    let client = PredictionClient::new(&config.endpoint)
        .context("failed to create prediction client")?;
    tracing::info!(url = %config.endpoint.url, "prediction client ready");

    // Metrics exposition server
    let state = AppState::new(metrics.clone());
    let app = build_router(state);

    let metrics_addr = format!("{}:{}", config.server.host, config.server.metrics_port);
    let listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics server on {}", metrics_addr))?;
    tracing::info!("metrics server listening on http://{}/metrics", metrics_addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("metrics server error: {}", e);
        }
    });

    // Traffic loop
    let generator = TrafficGenerator::new(
        dataset,
        client,
        metrics,
        config.traffic.tick_interval(),
    );
    let traffic_handle = tokio::spawn(generator.run());

    tokio::select! {
        _ = server_handle => {
            tracing::warn!("metrics server stopped");
        }
        _ = traffic_handle => {
            tracing::warn!("traffic generator stopped");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
        }
    }

    Ok(())
}
