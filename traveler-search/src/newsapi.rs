//! NewsAPI.org API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use traveler_core::SearchQuery;

use crate::error::SearchError;
use crate::keys::KeyPool;
use crate::provider::{ProviderPage, RawArticle, SearchProvider, PAGE_SIZE};

const NEWSAPI_BASE: &str = "https://newsapi.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// NewsAPI.org `/v2/everything` search client
///
/// NewsAPI paginates by page number, so the opaque continuation token this
/// client hands out is the decimal page number of the next page. Country
/// and category filters belong to a different NewsAPI endpoint and are
/// ignored here.
pub struct NewsApiClient {
    client: Client,
    keys: KeyPool,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    status: String,
    #[serde(rename = "totalResults", default)]
    total_results: usize,
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    source: Option<NewsApiSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    id: Option<String>,
    name: Option<String>,
}

impl NewsApiArticle {
    fn into_raw(self) -> RawArticle {
        RawArticle {
            source: self.source.and_then(|source| source.id.or(source.name)),
            author: self.author,
            title: self.title,
            description: self.description,
            body: self.content,
            url: self.url,
            image_url: self.url_to_image,
            published_at: self.published_at,
        }
    }
}

impl NewsApiClient {
    /// Create a client drawing credentials from the given pool
    pub fn new(keys: KeyPool) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            keys,
            base_url: NEWSAPI_BASE.to_string(),
        }
    }

    fn build_url(&self, query: &SearchQuery, page_number: usize, api_key: &str) -> String {
        let mut params = vec![
            format!("apiKey={}", api_key),
            format!("q={}", urlencoding::encode(&query.keyword)),
            "sortBy=publishedAt".to_string(),
            format!("pageSize={}", PAGE_SIZE),
            format!("page={}", page_number),
        ];

        if let Some(language) = &query.language {
            params.push(format!("language={}", language));
        }
        if let Some(domain) = &query.domain {
            params.push(format!("domains={}", domain));
        }
        if let Some(from) = &query.from_date {
            params.push(format!("from={}", from.format("%Y-%m-%d")));
        }
        if let Some(to) = &query.to_date {
            params.push(format!("to={}", to.format("%Y-%m-%d")));
        }

        format!("{}/v2/everything?{}", self.base_url, params.join("&"))
    }
}

/// Token for the page after `page_number`, or `None` once every result has
/// been served
fn next_page_token(page_number: usize, page_size: usize, total_results: usize) -> Option<String> {
    if page_number * page_size < total_results {
        Some((page_number + 1).to_string())
    } else {
        None
    }
}

#[async_trait]
impl SearchProvider for NewsApiClient {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    #[instrument(skip(self, query), fields(keyword = %query.keyword, page = ?query.page))]
    async fn fetch_page(&self, query: &SearchQuery) -> Result<ProviderPage, SearchError> {
        let page_number: usize = match &query.page {
            Some(token) => token
                .parse()
                .map_err(|_| SearchError::Parse(format!("invalid page token: {}", token)))?,
            None => 1,
        };

        let url = self.build_url(query, page_number, self.keys.next_key());

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "news-traveler/0.1")
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<NewsApiResponse>(&body)
                .ok()
                .map(|envelope| {
                    format!(
                        "{}, {}",
                        envelope.code.unwrap_or_else(|| "unknown".to_string()),
                        envelope.message.unwrap_or_else(|| "no message".to_string()),
                    )
                })
                .unwrap_or(body);
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        if envelope.status != "ok" {
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message: format!(
                    "{}, {}",
                    envelope.code.unwrap_or_else(|| "unknown".to_string()),
                    envelope.message.unwrap_or_else(|| "no message".to_string()),
                ),
            });
        }

        debug!(
            "NewsAPI returned {} of {} articles (page {})",
            envelope.articles.len(),
            envelope.total_results,
            page_number
        );

        Ok(ProviderPage {
            articles: envelope
                .articles
                .into_iter()
                .map(NewsApiArticle::into_raw)
                .collect(),
            next_page: next_page_token(page_number, PAGE_SIZE, envelope.total_results),
        })
    }
}
