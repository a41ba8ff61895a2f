use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Metrics exposition server configuration
    pub server: ServerConfig,

    /// Prediction endpoint configuration
    pub endpoint: EndpointConfig,

    /// Traffic generator configuration
    pub traffic: TrafficConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from compiled-in defaults, an optional file and
    /// the environment (prefix: CHURN_MONITOR__)
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("MONITOR_CONFIG_PATH")
            .unwrap_or_else(|_| "config/monitor.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables
            .add_source(
                config::Environment::with_prefix("CHURN_MONITOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind host for the metrics server
    #[serde(default = "default_host")]
    pub host: String,

    /// Port serving /metrics and /health
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Prediction endpoint URL (MLflow-style /invocations)
    #[serde(default = "default_endpoint_url")]
    pub url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_endpoint_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Delay between loop iterations (milliseconds)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Primary path of the reference dataset
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// File name searched for when the primary path is absent
    #[serde(default = "default_discovery_file_name")]
    pub discovery_file_name: String,

    /// Label column stripped from drawn samples
    #[serde(default = "default_label_column")]
    pub label_column: String,
}

impl TrafficConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_metrics_port() -> u16 {
    8000
}

fn default_endpoint_url() -> String {
    "http://127.0.0.1:5000/invocations".to_string()
}

fn default_endpoint_timeout() -> u64 {
    10
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/data_clean.csv")
}

fn default_discovery_file_name() -> String {
    "data_clean.csv".to_string()
}

fn default_label_column() -> String {
    "Churn".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_metrics_port(), 8000);
        assert_eq!(default_tick_interval_ms(), 1000);
        assert_eq!(default_label_column(), "Churn");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn test_compiled_in_defaults_deserialize() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.metrics_port, 8000);
        assert_eq!(config.endpoint.url, "http://127.0.0.1:5000/invocations");
        assert_eq!(config.traffic.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.traffic.discovery_file_name, "data_clean.csv");
    }
}
