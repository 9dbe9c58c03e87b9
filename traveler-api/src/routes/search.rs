//! News search endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::routes::{bad_request, require_body, require_str, service_error};
use crate::AppState;
use traveler_core::SentimentKind;
use traveler_services::OppositeSearch;

/// Query parameters for offset-addressed search
#[derive(Debug, Deserialize)]
struct SearchParams {
    /// Search keyword
    query: String,
    /// Number of articles to return
    count: usize,
    /// Number of leading results to skip
    offset: Option<usize>,
}

/// Create search routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_news))
        .route("/opposite-sentiment-news", post(opposite_sentiment_news))
}

/// GET /search?query=...&count=...&offset=... - Offset-paginated keyword search
async fn search_news(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return bad_request(rejection.body_text()),
    };
    let offset = params.offset.unwrap_or(0);

    match state
        .search_service
        .search_page(&params.query, params.count, offset)
        .await
    {
        Ok(page) => {
            let count = page.articles.len();
            let mut response = serde_json::json!({
                "results": page.articles,
                "count": count,
            });
            if let Some(next_offset) = page.next_offset {
                response["nextOffset"] = serde_json::json!(next_offset);
            }
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Search failed: {}", e);
            service_error(e)
        }
    }
}

/// POST /opposite-sentiment-news - Articles whose sentiment differs from the
/// submitted reference text
async fn opposite_sentiment_news(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let body = match require_body(body) {
        Ok(body) => body,
        Err(response) => return response,
    };
    let content = match require_str(&body, "content") {
        Ok(content) => content.to_string(),
        Err(response) => return response,
    };
    let keyword = match require_str(&body, "keyword") {
        Ok(keyword) => keyword.to_string(),
        Err(response) => return response,
    };

    let count = match body.get("count") {
        Some(value) => match value.as_u64() {
            Some(count) => Some(count as usize),
            None => return bad_request("invalid field value: count"),
        },
        None => None,
    };
    let similarity_threshold = match body.get("similarityThreshold") {
        Some(value) => match value.as_f64() {
            Some(threshold) => Some(threshold),
            None => return bad_request("invalid field value: similarityThreshold"),
        },
        None => None,
    };
    let sentiment_filter = match body.get("sentimentFilter") {
        Some(value) => match serde_json::from_value::<Vec<SentimentKind>>(value.clone()) {
            Ok(kinds) => Some(kinds),
            Err(_) => return bad_request("invalid field value: sentimentFilter"),
        },
        None => None,
    };

    let request = OppositeSearch {
        content,
        keyword,
        count,
        similarity_threshold,
        sentiment_filter,
    };

    match state.search_service.opposite_sentiment_news(&request).await {
        Ok(results) => {
            let count = results.len();
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "results": results,
                    "count": count,
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Opposite-sentiment search failed: {}", e);
            service_error(e)
        }
    }
}
