use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::PredictionError;

// ============================================================================
// Prediction Types
// ============================================================================

/// Body of `POST /prediction`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesRequest {
    pub features: Vec<f64>,
}

// ============================================================================
// System Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    #[serde(rename = "Hello")]
    pub hello: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub schema: String,
    pub threshold: f64,
    pub dataset_records: usize,
    pub uptime_secs: i64,
}

// ============================================================================
// Errors
// ============================================================================

/// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn api_error(status: StatusCode, detail: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
}

/// Field-level failures are 422, other bad input 400, inference 500.
///
/// Inference details stay in the logs; clients only see "Prediction failed".
impl From<PredictionError> for ApiError {
    fn from(err: PredictionError) -> Self {
        match &err {
            PredictionError::Validation(v) if v.field().is_some() => {
                api_error(StatusCode::UNPROCESSABLE_ENTITY, v.to_string())
            }
            PredictionError::Validation(v) => api_error(StatusCode::BAD_REQUEST, v.to_string()),
            PredictionError::Inference(_) => {
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
            }
        }
    }
}
