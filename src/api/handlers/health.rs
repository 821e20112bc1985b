//! Service health

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use super::AppState;
use crate::types::ModelStatus;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    /// Forecastable types with a fitted model
    pub trained_models: usize,
    pub models: Vec<ModelStatus>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let models = state.forecaster.status();
    Json(HealthResponse {
        status: "healthy",
        service: "ML Service",
        trained_models: models.iter().filter(|m| m.trained).count(),
        models,
    })
}
