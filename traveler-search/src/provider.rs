//! Provider abstraction over external news-search APIs

use async_trait::async_trait;

use traveler_core::SearchQuery;

use crate::error::SearchError;

/// Articles requested per provider page; the fixed intermediate batch size
/// every pagination loop works in
pub const PAGE_SIZE: usize = 10;

/// One raw article as a provider reported it, before normalization
///
/// Every field is optional here; the normalizer decides which records are
/// usable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawArticle {
    /// Identifier of the publishing outlet
    pub source: Option<String>,
    /// Author name(s), comma-joined when the provider reports several
    pub author: Option<String>,
    pub title: Option<String>,
    /// Short summary text
    pub description: Option<String>,
    /// Full article body, when the provider exposes one
    pub body: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
}

/// One page of provider results
#[derive(Debug, Clone, Default)]
pub struct ProviderPage {
    /// Raw articles in provider order
    pub articles: Vec<RawArticle>,
    /// Continuation token for the page after this one; absent when the
    /// provider has no further results
    pub next_page: Option<String>,
}

/// A news-search backend able to serve one page of results per call
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logs and health reporting
    fn name(&self) -> &'static str;

    /// Fetch the page addressed by `query.page` (the first page when absent)
    async fn fetch_page(&self, query: &SearchQuery) -> Result<ProviderPage, SearchError>;
}
