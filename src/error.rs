use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Reference dataset could not be found or is unusable; fatal at startup
    #[error("reference dataset unavailable: {0}")]
    DataUnavailable(String),

    /// Transport-level failure reaching the prediction endpoint
    #[error("prediction endpoint unreachable: {0}")]
    EndpointUnreachable(String),

    /// Prediction endpoint answered with a non-2xx status
    #[error("prediction endpoint returned status {status}")]
    NonSuccessStatus { status: u16 },

    /// HTTP 200 but the body matched no recognized response shape
    #[error("malformed prediction response: {0}")]
    MalformedResponse(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    /// Fatal errors terminate the process before the traffic loop starts;
    /// everything else is counted as a failed request and the loop continues.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            MonitorError::DataUnavailable(_) | MonitorError::Configuration(_) | MonitorError::Io(_)
        )
    }
}

/// Conversion from reqwest::Error
impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            MonitorError::NonSuccessStatus {
                status: status.as_u16(),
            }
        } else {
            // Connect, DNS and timeout failures all land here
            MonitorError::EndpointUnreachable(err.to_string())
        }
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for MonitorError {
    fn from(err: config::ConfigError) -> Self {
        MonitorError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(MonitorError::DataUnavailable("missing".to_string()).is_fatal());
        assert!(MonitorError::Configuration("bad".to_string()).is_fatal());
        assert!(!MonitorError::EndpointUnreachable("refused".to_string()).is_fatal());
        assert!(!MonitorError::NonSuccessStatus { status: 500 }.is_fatal());
        assert!(!MonitorError::MalformedResponse("empty".to_string()).is_fatal());
    }

    #[test]
    fn test_non_success_status_display() {
        let err = MonitorError::NonSuccessStatus { status: 503 };
        assert_eq!(err.to_string(), "prediction endpoint returned status 503");
    }

    #[test]
    fn test_config_error_conversion_is_fatal() {
        let err: MonitorError = config::ConfigError::NotFound("server.host".to_string()).into();
        assert!(matches!(err, MonitorError::Configuration(_)));
        assert!(err.is_fatal());
    }
}
