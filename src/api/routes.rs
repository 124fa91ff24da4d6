use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // System endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_handler))
        // Prediction endpoints
        .route("/prediction", post(handlers::predict_features))
        .route("/prediction/", post(handlers::predict_features))
        .route("/prediction/user", post(handlers::predict_user))
        // Analytics endpoints
        .route("/cardio/statistics", get(handlers::get_statistics))
        .route("/cardio/charts", get(handlers::get_all_charts))
        .route("/cardio/charts/:name", get(handlers::get_chart))
        .route("/cardio/correlation", get(handlers::get_correlation))
        .route("/cardio/dataset", get(handlers::get_dataset))
        // Add state, CORS and request tracing
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
