use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::analytics::{ChartData, CorrelationAnalysis, DatasetStatistics};
use crate::api::{state::AppState, types::*};

/// GET /cardio/statistics
pub async fn get_statistics(State(state): State<AppState>) -> Json<DatasetStatistics> {
    Json(state.analytics.statistics())
}

/// GET /cardio/charts
pub async fn get_all_charts(State(state): State<AppState>) -> Json<Vec<ChartData>> {
    Json(state.analytics.charts())
}

/// GET /cardio/charts/:name
pub async fn get_chart(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ChartData>, ApiError> {
    state
        .analytics
        .chart(&name)
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("unknown chart: {name}")))
}

/// GET /cardio/correlation
pub async fn get_correlation(State(state): State<AppState>) -> Json<CorrelationAnalysis> {
    Json(state.analytics.correlations())
}

/// GET /cardio/dataset
pub async fn get_dataset(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    serde_json::to_value(state.analytics.complete())
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
