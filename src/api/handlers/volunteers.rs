//! Volunteer matching and clustering

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::{json_body, AppState};
use crate::api::envelope::ApiErrorResponse;
use crate::matching::MatchRequest;
use crate::types::Volunteer;

/// Body for POST /api/ml/cluster-volunteers
#[derive(Debug, Default, Deserialize)]
pub struct ClusterRequest {
    #[serde(default)]
    pub volunteers: Vec<Volunteer>,
}

/// POST /api/ml/match-volunteers
pub async fn match_volunteers(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };
    match state.matcher.match_request(&request) {
        Ok(ranked) => Json(ranked).into_response(),
        Err(e) => ApiErrorResponse::engine(&e),
    }
}

/// POST /api/ml/cluster-volunteers
pub async fn cluster_volunteers(
    State(state): State<AppState>,
    payload: Result<Json<ClusterRequest>, JsonRejection>,
) -> Response {
    let request = match json_body(payload) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };
    match state.matcher.cluster(request.volunteers) {
        Ok(clustered) => Json(clustered).into_response(),
        Err(e) => ApiErrorResponse::engine(&e),
    }
}
