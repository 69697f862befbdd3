use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, warn};
use veritext_analysis::SAMPLE_TEXT;
use veritext_core::Error;

// ============================================================================
// Errors
// ============================================================================

/// JSON error body returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub kind: String,
}

/// Maps analysis errors onto HTTP responses
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            Error::InputEmpty => (
                StatusCode::BAD_REQUEST,
                "Please enter text to analyze!".to_string(),
            ),
            Error::ClassificationFailure(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error during analysis: {}", msg),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error during analysis: {}", other),
            ),
        };

        let body = ErrorBody {
            error: message,
            kind: self.0.kind().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// ============================================================================
// Health and model endpoints
// ============================================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub loaded: bool,
    pub max_length: usize,
}

pub async fn model_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(ModelInfo {
        name: state.model_name(),
        loaded: state.is_model_loaded(),
        max_length: state.config.model.inference.max_length,
    })
}

// ============================================================================
// Analysis endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

pub async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let start = Instant::now();

    match state.analyze(&req.text).await {
        Ok(report) => {
            metrics::counter!("veritext_analyses_total", "outcome" => "success").increment(1);
            metrics::counter!("veritext_segments_scored_total")
                .increment(report.segments.len() as u64);
            metrics::histogram!("veritext_analysis_latency_ms")
                .record(start.elapsed().as_secs_f64() * 1000.0);
            Ok(Json(report))
        }
        Err(err) => {
            let outcome = if err.is_user_error() { "rejected" } else { "failed" };
            metrics::counter!("veritext_analyses_total", "outcome" => outcome).increment(1);
            metrics::counter!("veritext_errors_total", "kind" => err.kind()).increment(1);

            if err.is_user_error() {
                warn!("Analysis rejected: {}", err);
            } else {
                error!("Analysis failed: {}", err);
            }
            Err(ApiError(err))
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SampleText {
    pub text: String,
}

pub async fn sample() -> impl IntoResponse {
    Json(SampleText {
        text: SAMPLE_TEXT.to_string(),
    })
}

// ============================================================================
// Metrics endpoint
// ============================================================================

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.render_metrics() {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
