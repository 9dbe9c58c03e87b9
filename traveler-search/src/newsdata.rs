//! NewsData.io API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use traveler_core::SearchQuery;

use crate::error::SearchError;
use crate::keys::KeyPool;
use crate::provider::{ProviderPage, RawArticle, SearchProvider};

const NEWSDATA_API_BASE: &str = "https://newsdata.io";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// NewsData.io latest-news search client
///
/// Serves pages at the API's default size, addressed by the opaque
/// `nextPage` token the API returns. Date-range filters are not part of
/// this API's parameter set and are ignored here.
pub struct NewsDataClient {
    client: Client,
    keys: KeyPool,
    base_url: String,
}

/// Response envelope; `results` is an article array on success and an
/// error object when `status` is "error"
#[derive(Debug, Deserialize)]
struct NewsDataResponse {
    status: String,
    #[serde(default)]
    results: serde_json::Value,
    #[serde(rename = "nextPage")]
    next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsDataArticle {
    source_id: Option<String>,
    creator: Option<Vec<String>>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    link: Option<String>,
    image_url: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct NewsDataErrorBody {
    message: Option<String>,
    code: Option<String>,
}

impl NewsDataArticle {
    fn into_raw(self) -> RawArticle {
        RawArticle {
            source: self.source_id,
            author: self
                .creator
                .filter(|creators| !creators.is_empty())
                .map(|creators| creators.join(",")),
            title: self.title,
            description: self.description,
            body: self.content,
            url: self.link,
            image_url: self.image_url,
            published_at: self.pub_date,
        }
    }
}

impl NewsDataErrorBody {
    fn into_message(self) -> String {
        format!(
            "{}, {}",
            self.code.unwrap_or_else(|| "unknown".to_string()),
            self.message.unwrap_or_else(|| "no message".to_string()),
        )
    }
}

impl NewsDataClient {
    /// Create a client drawing credentials from the given pool
    pub fn new(keys: KeyPool) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            keys,
            base_url: NEWSDATA_API_BASE.to_string(),
        }
    }

    fn build_url(&self, query: &SearchQuery, api_key: &str) -> String {
        let mut params = vec![
            format!("apikey={}", api_key),
            format!("q={}", urlencoding::encode(&query.keyword)),
        ];

        if let Some(language) = &query.language {
            params.push(format!("language={}", language));
        }
        if let Some(country) = &query.country {
            params.push(format!("country={}", country));
        }
        if let Some(category) = &query.category {
            params.push(format!("category={}", category));
        }
        if let Some(domain) = &query.domain {
            params.push(format!("domain={}", domain));
        }
        if let Some(page) = &query.page {
            params.push(format!("page={}", page));
        }

        format!("{}/api/1/news?{}", self.base_url, params.join("&"))
    }
}

#[async_trait]
impl SearchProvider for NewsDataClient {
    fn name(&self) -> &'static str {
        "newsdata"
    }

    #[instrument(skip(self, query), fields(keyword = %query.keyword, page = ?query.page))]
    async fn fetch_page(&self, query: &SearchQuery) -> Result<ProviderPage, SearchError> {
        let url = self.build_url(query, self.keys.next_key());

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<NewsDataResponse>(&body)
                .ok()
                .and_then(|envelope| {
                    serde_json::from_value::<NewsDataErrorBody>(envelope.results).ok()
                })
                .map(NewsDataErrorBody::into_message)
                .unwrap_or(body);
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: NewsDataResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        // The API can report an error status inside a 200 response
        if envelope.status != "success" {
            let error: NewsDataErrorBody =
                serde_json::from_value(envelope.results).unwrap_or_default();
            return Err(SearchError::Provider {
                status: status.as_u16(),
                message: error.into_message(),
            });
        }

        let articles: Vec<NewsDataArticle> = serde_json::from_value(envelope.results)
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        debug!("NewsData returned {} articles", articles.len());

        Ok(ProviderPage {
            articles: articles.into_iter().map(NewsDataArticle::into_raw).collect(),
            next_page: envelope.next_page.filter(|token| !token.is_empty()),
        })
    }
}
