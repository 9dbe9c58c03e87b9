//! Single-article scoring endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tracing::error;

use crate::routes::{bad_request, internal_error, require_body, require_str, service_error};
use crate::AppState;
use traveler_services::SearchServiceError;

/// Create scoring routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sentiment", post(classify_sentiment))
        .route("/bias", post(score_bias))
        .route("/sentiment-and-bias", post(score_both))
}

/// POST /sentiment - Classify the sentiment of a piece of text
async fn classify_sentiment(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let body = match require_body(body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let content = match require_str(&body, "content") {
        Ok(content) => content,
        Err(response) => return response,
    };

    match state.search_service.classify_sentiment(content).await {
        Ok(sentiment) => (
            StatusCode::OK,
            Json(serde_json::json!({ "sentiment": sentiment })),
        )
            .into_response(),
        Err(e) => {
            error!("Sentiment classification failed: {}", e);
            service_error(e)
        }
    }
}

/// POST /bias - Score the political bias of a piece of text
async fn score_bias(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let body = match require_body(body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let content = match require_str(&body, "content") {
        Ok(content) => content,
        Err(response) => return response,
    };

    match state.search_service.score_bias(content).await {
        Ok(bias) => (StatusCode::OK, Json(serde_json::json!({ "bias": bias }))).into_response(),
        Err(e) => {
            error!("Bias scoring failed: {}", e);
            service_error(e)
        }
    }
}

/// POST /sentiment-and-bias - Score sentiment and bias together
///
/// When one scorer fails, the 500 body still carries whatever the other
/// produced, so callers can display the surviving score.
async fn score_both(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let body = match require_body(body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let content = match require_str(&body, "content") {
        Ok(content) => content,
        Err(response) => return response,
    };

    match state.search_service.score_article(content).await {
        Ok(scores) => (StatusCode::OK, Json(scores)).into_response(),
        Err(SearchServiceError::PartialScores(partial)) => {
            error!("Combined scoring failed: {}", partial.message);
            let mut response = serde_json::json!({
                "message": partial.message,
                "debug": "",
            });
            if let Some(sentiment) = partial.sentiment {
                response["sentiment"] = serde_json::json!(sentiment);
            }
            if let Some(bias) = partial.bias {
                response["bias"] = serde_json::json!(bias);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
        Err(SearchServiceError::InvalidRequest(message)) => bad_request(message),
        Err(e) => {
            error!("Combined scoring failed: {}", e);
            internal_error(e.to_string())
        }
    }
}
