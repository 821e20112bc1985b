//! API route definitions
//!
//! - /health - service liveness plus model status
//! - /api/ml/* - classification, forecasting, matching and allocation

use axum::{routing::{get, post}, Router};

use super::handlers::{self, AppState};

/// Decision endpoints, nested under `/api/ml`
pub fn ml_routes(state: AppState) -> Router {
    Router::new()
        .route("/classify-request", post(handlers::classify_request))
        // Forecasting
        .route("/forecast-demand", post(handlers::forecast_demand))
        .route("/forecast-all", get(handlers::forecast_all))
        .route("/analyze-disaster", post(handlers::analyze))
        .route("/train", post(handlers::train_models))
        .route("/models", get(handlers::model_status))
        // Volunteers
        .route("/match-volunteers", post(handlers::match_volunteers))
        .route("/cluster-volunteers", post(handlers::cluster_volunteers))
        // Inventory
        .route("/optimize-allocation", post(handlers::optimize_allocation))
        .with_state(state)
}

/// Health endpoint at root level
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
