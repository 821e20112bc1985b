//! Demand forecasting, training and disaster analysis

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::{json_body, query_params, AppState};
use crate::analysis::analyze_disaster;
use crate::api::envelope::ApiErrorResponse;
use crate::config::defaults::{DEFAULT_AFFECTED_AREA, DEFAULT_SEVERITY};
use crate::types::{ForecastFeatures, HistoricalRecord, ResourceType};

/// Body for POST /api/ml/forecast-demand
#[derive(Debug, Default, Deserialize)]
pub struct ForecastRequest {
    /// Missing or unrecognised means `General`
    #[serde(default)]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub affected_area: Option<i64>,
    #[serde(default)]
    pub severity: Option<i64>,
}

/// Query for GET /api/ml/forecast-all and body for POST /api/ml/analyze-disaster
#[derive(Debug, Default, Deserialize)]
pub struct ScenarioParams {
    #[serde(default)]
    pub affected_area: Option<i64>,
    #[serde(default)]
    pub severity: Option<i64>,
}

impl ScenarioParams {
    fn features(&self) -> ForecastFeatures {
        ForecastFeatures::now(
            self.affected_area.unwrap_or(DEFAULT_AFFECTED_AREA),
            self.severity.unwrap_or(DEFAULT_SEVERITY),
        )
    }
}

/// Body for POST /api/ml/train
#[derive(Debug, Default, Deserialize)]
pub struct TrainRequest {
    #[serde(default)]
    pub records: Vec<HistoricalRecord>,
}

/// POST /api/ml/forecast-demand
pub async fn forecast_demand(
    State(state): State<AppState>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };

    let resource_type = match body.resource_type.as_deref() {
        None => ResourceType::General,
        // Unrecognised names take the General default rather than failing
        Some(name) => name.parse::<ResourceType>().unwrap_or_else(|_| {
            debug!(resource_type = name, "Unknown resource type, forecasting as General");
            ResourceType::General
        }),
    };

    let features = ScenarioParams {
        affected_area: body.affected_area,
        severity: body.severity,
    }
    .features();

    Json(state.forecaster.predict(resource_type, &features)).into_response()
}

/// GET /api/ml/forecast-all
pub async fn forecast_all(
    State(state): State<AppState>,
    params: Result<Query<ScenarioParams>, QueryRejection>,
) -> Response {
    let params = match query_params(params) {
        Ok(params) => params,
        Err(rejection) => return rejection,
    };
    Json(state.forecaster.forecast_all(&params.features())).into_response()
}

/// POST /api/ml/analyze-disaster
pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioParams>, JsonRejection>,
) -> Response {
    let params = match json_body(payload) {
        Ok(params) => params,
        Err(rejection) => return rejection,
    };
    let analysis = analyze_disaster(
        &state.forecaster,
        params.affected_area.unwrap_or(DEFAULT_AFFECTED_AREA),
        params.severity.unwrap_or(DEFAULT_SEVERITY),
    );
    Json(analysis).into_response()
}

/// POST /api/ml/train
///
/// Fitting is CPU-bound, so it runs on the blocking pool.
pub async fn train_models(
    State(state): State<AppState>,
    payload: Result<Json<TrainRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };

    let forecaster = Arc::clone(&state.forecaster);
    let result = tokio::task::spawn_blocking(move || forecaster.train(&body.records)).await;

    match result {
        Ok(Ok(summary)) => {
            info!(
                rows = summary.total_rows,
                trained = summary.trained_count(),
                "Training request complete"
            );
            Json(summary).into_response()
        }
        Ok(Err(e)) => ApiErrorResponse::engine(&e),
        Err(e) => {
            error!(error = %e, "Training task failed");
            ApiErrorResponse::internal("Training task failed")
        }
    }
}

/// GET /api/ml/models
pub async fn model_status(State(state): State<AppState>) -> Response {
    Json(state.forecaster.status()).into_response()
}
