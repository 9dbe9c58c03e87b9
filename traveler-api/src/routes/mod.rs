//! API route definitions

mod analyze;
mod health;
mod search;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::Value;

use crate::AppState;
use traveler_services::SearchServiceError;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(analyze::routes())
        .merge(search::routes())
        .merge(health::routes())
}

/// 400 response carrying a field-identifying message
fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "message": message.into() })),
    )
        .into_response()
}

/// 500 response; `debug` is a reserved diagnostics hook, currently empty
fn internal_error(message: impl Into<String>) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "message": message.into(), "debug": "" })),
    )
        .into_response()
}

/// Map a service error to the declared status and body shape.
///
/// `PartialScores` is handled by the combined-scoring handler, which has a
/// richer error body; any other path reaching it treats it as a plain 500.
fn service_error(err: SearchServiceError) -> Response {
    match err {
        SearchServiceError::InvalidRequest(message) => bad_request(message),
        other => internal_error(other.to_string()),
    }
}

/// Unwrap a JSON body extraction, mapping rejections to the 400 shape
fn require_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, Response> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(bad_request(format!(
            "json decode error: {}",
            rejection.body_text()
        ))),
    }
}

/// Pull a required string field out of a JSON body
fn require_str<'a>(body: &'a Value, field: &str) -> Result<&'a str, Response> {
    body.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| bad_request(format!("key not found: {}", field)))
}
