//! API route handlers
//!
//! One file per concern:
//! - Health and model status
//! - Request classification
//! - Demand forecasting, training and disaster analysis
//! - Volunteer matching and clustering
//! - Resource allocation

mod allocation;
mod classify;
mod forecast;
mod health;
mod volunteers;

pub use allocation::*;
pub use classify::*;
pub use forecast::*;
pub use health::*;
pub use volunteers::*;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};
use axum::http::StatusCode;
use axum::response::Response;
use std::sync::Arc;

use super::envelope::ApiErrorResponse;
use crate::classifier::RequestClassifier;
use crate::config::EngineConfig;
use crate::forecast::DemandForecaster;
use crate::matching::VolunteerMatcher;
use crate::optimization::ResourceOptimizer;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct AppState {
    pub classifier: RequestClassifier,
    /// The only component with mutable state; shared across requests
    pub forecaster: Arc<DemandForecaster>,
    pub matcher: Arc<VolunteerMatcher>,
    pub optimizer: ResourceOptimizer,
}

impl AppState {
    /// Build fresh (untrained) engine components from config.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_forecaster(config, Arc::new(DemandForecaster::new(config.forecaster.clone())))
    }

    /// Build state around an existing forecaster (e.g. one trained at startup).
    pub fn with_forecaster(config: &EngineConfig, forecaster: Arc<DemandForecaster>) -> Self {
        Self {
            classifier: RequestClassifier::new(),
            forecaster,
            matcher: Arc::new(VolunteerMatcher::new(config.matcher.clone())),
            optimizer: ResourceOptimizer::new(),
        }
    }
}

// ============================================================================
// Extractor helpers
// ============================================================================

/// Unwrap a JSON body, rendering a rejection in the error envelope.
///
/// Oversized bodies keep their 413; every other rejection is a 400.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiErrorResponse::payload_too_large(rejection.body_text())
        } else {
            ApiErrorResponse::bad_request(rejection.body_text())
        }
    })
}

/// Unwrap a query string, rendering a rejection in the error envelope.
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, Response> {
    params
        .map(|Query(q)| q)
        .map_err(|rejection| ApiErrorResponse::bad_request(rejection.body_text()))
}
