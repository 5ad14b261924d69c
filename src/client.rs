// Prediction API client
// POST {base}/predict/{endpoint} with the form payload as JSON

use crate::error::{Result, ScreeningError, API_FALLBACK_MESSAGE};
use crate::forms::FormKind;
use crate::validation::Payload;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Response body of every /predict endpoint
///
/// Pre-screenings fill `risk_percentage` and `risk_level`, the detailed
/// forms fill `prediction`. Failures carry `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_percentage: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<HashMap<String, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct PredictionClient {
    http: reqwest::Client,
    base_url: String,
}

impl PredictionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScreeningError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(PredictionClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint_url(&self, kind: FormKind) -> String {
        format!("{}/predict/{}", self.base_url, kind.endpoint())
    }

    /// Send one prediction request and decode the answer
    pub async fn predict(&self, kind: FormKind, payload: &Payload) -> Result<PredictionResponse> {
        let url = self.endpoint_url(kind);
        debug!(%url, fields = payload.len(), "sending prediction request");

        let response = self.http.post(&url).json(payload).send().await?;
        let status = response.status();

        let body: PredictionResponse = response.json().await.map_err(|e| {
            warn!(%url, %status, error = %e, "undecodable prediction response");
            ScreeningError::Connection(e.to_string())
        })?;

        if !status.is_success() {
            let message = body
                .error
                .clone()
                .unwrap_or_else(|| API_FALLBACK_MESSAGE.to_string());
            warn!(%url, %status, %message, "prediction API rejected request");
            return Err(ScreeningError::Api(message));
        }

        if body.risk_percentage.is_none() && body.prediction.is_none() {
            let message = body
                .error
                .clone()
                .unwrap_or_else(|| API_FALLBACK_MESSAGE.to_string());
            return Err(ScreeningError::Api(message));
        }

        Ok(body)
    }
}

// ============================================================================
// TESTS
// ============================================================================
