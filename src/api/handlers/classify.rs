//! Free-text request classification

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::{json_body, AppState};

/// Body for POST /api/ml/classify-request. Missing text classifies as "".
#[derive(Debug, Default, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /api/ml/classify-request
pub async fn classify_request(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(rejection) => return rejection,
    };
    let text = body.text.unwrap_or_default();
    Json(state.classifier.classify(&text)).into_response()
}
