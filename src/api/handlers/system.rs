use axum::{extract::State, Json};

use crate::api::{state::AppState, types::*};

/// GET /
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        hello: "Hello world".to_string(),
    })
}

/// GET /health -- liveness probe; artifacts are always loaded once serving
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        schema: state.pipeline.schema().id.to_string(),
        threshold: state.pipeline.artifacts().threshold().value(),
        dataset_records: state.analytics.dataset().len(),
        uptime_secs: state.uptime_seconds(),
    })
}
