//! HTTP client for the deployed model endpoint.
//!
//! Serving stacks are not consistent about their response shape, so the
//! body is normalized through an ordered set of pattern-matching rules
//! rather than trusting a single schema.

use crate::config::EndpointConfig;
use crate::dataset::Sample;
use crate::error::{MonitorError, Result};
use rand::Rng;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Confidence is not returned by the endpoint; the gauge is fed from this
/// uniform range instead. Placeholder telemetry, not model output.
const SIMULATED_CONFIDENCE_RANGE: std::ops::Range<f64> = 0.70..0.99;

/// Same for drift magnitude: random noise standing in for a real
/// distribution-shift signal.
const SIMULATED_DRIFT_RANGE: std::ops::Range<f64> = 0.0..0.1;

/// Normalized outcome of one prediction call
#[derive(Debug, Clone, Copy)]
pub struct PredictionResult {
    /// Class label resolved from the response body
    pub label: i64,
    /// Simulated confidence score in [0.70, 0.99)
    pub confidence: f64,
    /// Simulated drift magnitude in [0, 0.1)
    pub drift_magnitude: f64,
    /// Size of the serialized request payload in bytes
    pub request_bytes: usize,
}

/// Client issuing synchronous prediction requests
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    url: String,
}

impl PredictionClient {
    /// Create a new prediction client
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                MonitorError::Configuration(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    /// Issue one prediction request for `sample`.
    ///
    /// All returned errors are recoverable: the caller records them as
    /// failed attempts and moves on to the next tick.
    pub async fn predict(&self, sample: &Sample<'_>) -> Result<PredictionResult> {
        let envelope = build_envelope(sample);
        let payload = serde_json::to_vec(&envelope)
            .map_err(|e| MonitorError::Configuration(format!("payload serialization: {}", e)))?;
        let request_bytes = payload.len();

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MonitorError::NonSuccessStatus {
                status: status.as_u16(),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| MonitorError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        let label = resolve_class_label(&body)?;

        let mut rng = rand::thread_rng();
        Ok(PredictionResult {
            label,
            confidence: rng.gen_range(SIMULATED_CONFIDENCE_RANGE),
            drift_magnitude: rng.gen_range(SIMULATED_DRIFT_RANGE),
            request_bytes,
        })
    }
}

/// Build the `dataframe_split` envelope for a single row: ordered column
/// names plus ordered values, no `index` key.
pub fn build_envelope(sample: &Sample<'_>) -> Value {
    json!({
        "dataframe_split": {
            "columns": sample.columns,
            "data": [sample.values],
        }
    })
}

/// Resolve the class label from a response body.
///
/// Rules are tried in order and the first match wins:
/// 1. a flat array: take the first element
/// 2. an object with a "predictions" array: take its first element
/// 3. any other object: take the first value; if that value is an array,
///    take its first element, else use it directly
///
/// The order matters: serving shapes in the wild are ambiguous and this
/// preference chain is what callers have come to depend on.
pub fn resolve_class_label(body: &Value) -> Result<i64> {
    match body {
        Value::Array(items) => {
            let first = items.first().ok_or_else(|| {
                MonitorError::MalformedResponse("empty prediction array".to_string())
            })?;
            as_class_label(first)
        }
        Value::Object(map) => {
            if let Some(Value::Array(predictions)) = map.get("predictions") {
                let first = predictions.first().ok_or_else(|| {
                    MonitorError::MalformedResponse("empty 'predictions' array".to_string())
                })?;
                return as_class_label(first);
            }

            let first_value = map.values().next().ok_or_else(|| {
                MonitorError::MalformedResponse("empty response object".to_string())
            })?;
            match first_value {
                Value::Array(items) => {
                    let first = items.first().ok_or_else(|| {
                        MonitorError::MalformedResponse("empty nested array".to_string())
                    })?;
                    as_class_label(first)
                }
                other => as_class_label(other),
            }
        }
        other => Err(MonitorError::MalformedResponse(format!(
            "unrecognized response shape: {}",
            other
        ))),
    }
}

/// Cast a resolved JSON value to an integer class label. Integer-valued
/// floats are accepted; anything else is malformed.
fn as_class_label(value: &Value) -> Result<i64> {
    if let Some(int) = value.as_i64() {
        return Ok(int);
    }
    if let Some(float) = value.as_f64() {
        if float.fract() == 0.0 && float.is_finite() {
            return Ok(float as i64);
        }
    }
    Err(MonitorError::MalformedResponse(format!(
        "value {} is not an integer class label",
        value
    )))
}
