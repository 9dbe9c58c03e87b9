//! News Traveler API Server
//!
//! HTTP API server that searches external news providers and scores
//! articles for sentiment, political bias, and topical similarity.

mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{bail, Context};
use axum::{
    http::{header, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use traveler_scoring::{
    BiasScorer, BipartisanPressClient, DigestBias, LexiconSentiment, SentimentAnalyzer,
    SentimentServiceClient, SimilarityScorer, SimilarityServiceClient, TfidfSimilarity,
};
use traveler_search::{KeyPool, NewsApiClient, NewsDataClient, SearchProvider};
use traveler_services::{SearchService, SearchServiceConfig};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<SearchService>,
}

/// Read a comma-separated key pool from the environment; empty or absent
/// values are fatal because every request through the provider needs one.
fn key_pool_from_env(var: &str) -> anyhow::Result<KeyPool> {
    let raw = std::env::var(var).with_context(|| format!("{} must be set", var))?;
    KeyPool::from_csv(&raw).with_context(|| format!("{} must hold at least one key", var))
}

/// Parse-check a remote adapter URL before any request depends on it.
fn adapter_url_from_env(var: &str) -> anyhow::Result<Option<String>> {
    match std::env::var(var) {
        Ok(raw) => {
            url::Url::parse(&raw).with_context(|| format!("{} is not a valid URL", var))?;
            Ok(Some(raw))
        }
        Err(_) => Ok(None),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,traveler_api=debug")),
        )
        .init();

    info!("Starting News Traveler API");

    // Select the search provider; its credential pool is required up front
    let provider_name =
        std::env::var("SEARCH_PROVIDER").unwrap_or_else(|_| "newsdata".to_string());
    let provider: Arc<dyn SearchProvider> = match provider_name.as_str() {
        "newsdata" => Arc::new(NewsDataClient::new(key_pool_from_env("NEWSDATAAPI_KEY")?)),
        "newsapi" => Arc::new(NewsApiClient::new(key_pool_from_env("NEWSAPI_KEY")?)),
        other => bail!("unknown SEARCH_PROVIDER '{}'; use 'newsdata' or 'newsapi'", other),
    };
    info!("Search provider: {}", provider.name());

    // Each scoring adapter falls back to its deterministic built-in when
    // the remote service isn't configured
    let sentiment: Arc<dyn SentimentAnalyzer> = match adapter_url_from_env("SENTIMENT_API_URL")? {
        Some(base) => {
            info!("Sentiment: remote service at {}", base);
            Arc::new(SentimentServiceClient::new(base))
        }
        None => {
            info!("Sentiment: built-in lexicon classifier (SENTIMENT_API_URL not set)");
            Arc::new(LexiconSentiment)
        }
    };

    let bias: Arc<dyn BiasScorer> = match std::env::var("BIASAPI_KEY") {
        Ok(key) => {
            info!("Bias: Bipartisan Press API");
            Arc::new(BipartisanPressClient::new(key))
        }
        Err(_) => {
            info!("Bias: built-in digest scorer (BIASAPI_KEY not set)");
            Arc::new(DigestBias)
        }
    };

    let similarity: Arc<dyn SimilarityScorer> = match adapter_url_from_env("SIMILARITY_API_URL")? {
        Some(base) => {
            info!("Similarity: remote service at {}", base);
            Arc::new(SimilarityServiceClient::new(base))
        }
        None => {
            info!("Similarity: built-in TF-IDF scorer (SIMILARITY_API_URL not set)");
            Arc::new(TfidfSimilarity)
        }
    };

    let search_service = Arc::new(SearchService::new(
        provider,
        sentiment,
        bias,
        similarity,
        SearchServiceConfig::default(),
    ));

    let state = AppState { search_service };

    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    // Build router
    let app = Router::new()
        .merge(routes::api_routes())
        .layer(cors)
        .with_state(state);

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
