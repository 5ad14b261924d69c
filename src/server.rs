// Prediction API - axum router
// POST /predict/{form} answers with rule-based scores

use crate::client::PredictionResponse;
use crate::fields::FieldRegistry;
use crate::forms::FormKind;
use crate::risk::Outcome;
use crate::scoring;
use crate::validation::{parse_number, Payload};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn};
use uuid::Uuid;

pub const HOME_MESSAGE: &str = "Health Prediction API running successfully";
pub const INVALID_INPUT: &str = "Invalid input";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            started_at: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: i64,
    endpoints: Vec<String>,
}

fn error_body(message: impl Into<String>) -> Json<PredictionResponse> {
    Json(PredictionResponse {
        error: Some(message.into()),
        ..Default::default()
    })
}

// ============================================================================
// Request decoding
// ============================================================================

/// Read the form's fields out of a JSON body
///
/// Missing or null fields count as 0; numbers and numeric strings are
/// accepted; anything else, booleans included, is invalid.
pub fn extract_payload(kind: FormKind, body: &[u8]) -> Result<Payload, String> {
    let value: Value = if body.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(body).map_err(|e| e.to_string())?
    };

    let object = value
        .as_object()
        .ok_or_else(|| "request body must be a JSON object".to_string())?;

    let mut payload = Payload::new();
    for field in FieldRegistry::for_form(kind).fields() {
        let number = match object.get(&field.name) {
            None | Some(Value::Null) => 0.0,
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| format!("{} is not a finite number", field.name))?,
            Some(Value::String(s)) => {
                parse_number(s).ok_or_else(|| format!("{} is not a number: {:?}", field.name, s))?
            }
            Some(other) => return Err(format!("{} has unsupported value {}", field.name, other)),
        };
        payload.insert(field.name.clone(), number);
    }

    Ok(payload)
}

fn response_for(outcome: &Outcome, payload: &Payload) -> PredictionResponse {
    let values: HashMap<String, f64> = payload.iter().map(|(k, v)| (k.to_string(), v)).collect();

    match outcome {
        Outcome::Risk { percentage, band } => PredictionResponse {
            risk_percentage: Some(*percentage),
            risk_level: Some(band.label().to_string()),
            values: Some(values),
            ..Default::default()
        },
        Outcome::Label { prediction, .. } => PredictionResponse {
            prediction: Some(prediction.clone()),
            values: Some(values),
            ..Default::default()
        },
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Service banner
async fn home() -> impl IntoResponse {
    Json(json!({ "message": HOME_MESSAGE }))
}

/// GET /health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
        uptime_secs: (Utc::now() - state.started_at).num_seconds(),
        endpoints: FormKind::all()
            .iter()
            .map(|k| format!("/predict/{}", k.endpoint()))
            .collect(),
    })
}

/// POST /predict/:form - Score one screening
async fn predict(Path(name): Path<String>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();
    info_span!("predict", %request_id, form = %name).in_scope(|| score_request(&name, &body))
}

fn score_request(name: &str, body: &[u8]) -> Response {
    let Some(kind) = FormKind::from_endpoint(name) else {
        warn!("unknown screening requested");
        return (
            StatusCode::NOT_FOUND,
            error_body(format!("Unknown screening: {}", name)),
        )
            .into_response();
    };

    match extract_payload(kind, body) {
        Ok(payload) => {
            let outcome = scoring::evaluate(kind, &payload);
            info!(headline = %outcome.headline(), "scored");
            (StatusCode::OK, Json(response_for(&outcome, &payload))).into_response()
        }
        Err(e) => {
            warn!(error = %e, "rejecting prediction request");
            (StatusCode::BAD_REQUEST, error_body(INVALID_INPUT)).into_response()
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_check))
        .route("/predict/:form", post(predict))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        let app = build_router(AppState::new());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_home_message() {
        let app = build_router(AppState::new());
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], HOME_MESSAGE);
    }

    #[tokio::test]
    async fn test_health_lists_endpoints() {
        let app = build_router(AppState::new());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_pre_diabetes_risk() {
        let (status, body) =
            post_json("/predict/pre-diabetes", r#"{"age": 45, "bmi": 27, "glucose": 110}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_percentage"], 45.0);
        assert_eq!(body["risk_level"], "Moderate");
        assert_eq!(body["values"]["glucose"], 110.0);
    }

    #[tokio::test]
    async fn test_numeric_strings_accepted() {
        let (status, body) = post_json(
            "/predict/pre-breast",
            r#"{"age": "65", "family_history": "1", "lump_detected": 1, "pain_level": 0}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_percentage"], 95.0);
        assert_eq!(body["risk_level"], "High");
    }

    #[tokio::test]
    async fn test_missing_fields_default_to_zero() {
        let (status, body) = post_json("/predict/symptom", r#"{"fever": 3}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "Mild Symptoms");
        assert_eq!(body["values"]["cough"], 0.0);
    }

    #[tokio::test]
    async fn test_detailed_prediction_label() {
        let (status, body) = post_json(
            "/predict/heart",
            r#"{"chol": 260, "trestbps": 150, "thalach": 100}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction"], "High Risk of Heart Disease");
        assert!(body.get("risk_percentage").is_none());
    }

    #[tokio::test]
    async fn test_invalid_input_is_400() {
        let (status, body) = post_json("/predict/pre-heart", r#"{"age": "old"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], INVALID_INPUT);

        let (status, _) = post_json("/predict/pre-heart", r#"[1, 2, 3]"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json("/predict/pre-heart", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_screening_is_404() {
        let (status, body) = post_json("/predict/pre-lungs", "{}").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Unknown screening: pre-lungs");
    }

    #[test]
    fn test_extract_payload_uses_form_fields_only() {
        let payload = extract_payload(
            FormKind::PreDiabetes,
            br#"{"age": 50, "bmi": 22, "glucose": 90, "shoe_size": 44}"#,
        )
        .unwrap();

        assert_eq!(payload.len(), 3);
        assert_eq!(payload.get("shoe_size"), None);
    }

    #[test]
    fn test_extract_payload_rejects_booleans() {
        let err = extract_payload(FormKind::PreBreast, br#"{"family_history": true}"#).unwrap_err();
        assert!(err.contains("family_history"));
    }

    #[tokio::test]
    async fn test_boolean_field_is_400() {
        let (status, body) = post_json("/predict/pre-breast", r#"{"lump_detected": false}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], INVALID_INPUT);
    }

    #[test]
    fn test_extract_payload_empty_body() {
        let payload = extract_payload(FormKind::PreHeart, b"").unwrap();
        assert_eq!(payload.sum(), 0.0);
    }
}
