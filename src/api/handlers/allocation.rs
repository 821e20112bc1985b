//! Resource allocation

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::{json_body, AppState};
use crate::api::envelope::ApiErrorResponse;
use crate::optimization::AllocationBatch;

/// POST /api/ml/optimize-allocation
pub async fn optimize_allocation(
    State(state): State<AppState>,
    payload: Result<Json<AllocationBatch>, JsonRejection>,
) -> Response {
    let batch = match json_body(payload) {
        Ok(batch) => batch,
        Err(rejection) => return rejection,
    };
    match state.optimizer.allocate_batch(&batch) {
        Ok(allocations) => Json(allocations).into_response(),
        Err(e) => ApiErrorResponse::engine(&e),
    }
}
