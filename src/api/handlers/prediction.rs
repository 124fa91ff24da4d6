use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};

use crate::api::{state::AppState, types::*};
use crate::prediction::{PatientObservation, PredictionResult, RawInput};

/// Malformed or mistyped bodies are field-level problems, hence 422.
fn reject_body(rejection: JsonRejection) -> ApiError {
    api_error(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text())
}

fn run(state: &AppState, input: RawInput) -> Result<Json<PredictionResult>, ApiError> {
    state.pipeline.predict(input).map(Json).map_err(ApiError::from)
}

/// POST /prediction -- pre-encoded feature vector
pub async fn predict_features(
    State(state): State<AppState>,
    payload: Result<Json<FeaturesRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(req) = payload.map_err(reject_body)?;
    run(&state, RawInput::Features(req.features))
}

/// POST /prediction/user -- clinical fields
pub async fn predict_user(
    State(state): State<AppState>,
    payload: Result<Json<PatientObservation>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(observation) = payload.map_err(reject_body)?;
    run(&state, RawInput::Observation(observation))
}
