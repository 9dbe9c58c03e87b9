//! Shared test doubles for the service tests

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use traveler_core::{SearchQuery, Sentiment, SentimentKind};
use traveler_scoring::{BiasScorer, ScoringError, SentimentAnalyzer, SimilarityScorer};
use traveler_search::{ProviderPage, RawArticle, SearchError, SearchProvider};

/// Provider serving a scripted list of pages, addressed by numeric tokens.
pub(crate) struct ScriptedProvider {
    pages: Vec<ProviderPage>,
    fetches: AtomicUsize,
    fail_at_fetch: Option<usize>,
}

impl ScriptedProvider {
    pub(crate) fn new(pages: Vec<ProviderPage>) -> Self {
        Self {
            pages,
            fetches: AtomicUsize::new(0),
            fail_at_fetch: None,
        }
    }

    /// Fail the n-th fetch (1-based) with a provider error.
    pub(crate) fn failing_at(mut self, fetch: usize) -> Self {
        self.fail_at_fetch = Some(fetch);
        self
    }

    pub(crate) fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SearchProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn fetch_page(&self, query: &SearchQuery) -> Result<ProviderPage, SearchError> {
        let fetch = self.fetches.fetch_add(1, Ordering::Relaxed) + 1;
        if Some(fetch) == self.fail_at_fetch {
            return Err(SearchError::Provider {
                status: 500,
                message: "scripted failure".to_string(),
            });
        }
        let index: usize = match &query.page {
            Some(token) => token.parse().unwrap_or(0),
            None => 0,
        };
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

/// Page of `articles` whose token points at the scripted page `next_index`.
pub(crate) fn page(articles: Vec<RawArticle>, next_index: Option<usize>) -> ProviderPage {
    ProviderPage {
        articles,
        next_page: next_index.map(|i| i.to_string()),
    }
}

/// Raw article whose url embeds `tag` and whose description is `content`.
pub(crate) fn raw(tag: &str, content: &str) -> RawArticle {
    RawArticle {
        source: Some("wire".to_string()),
        title: Some(format!("article {}", tag)),
        description: Some(content.to_string()),
        url: Some(format!("https://example.com/{}", tag)),
        ..RawArticle::default()
    }
}

/// Classifier keyed on marker words: "happy" is positive, "sad" is
/// negative, anything else neutral. Counts calls so tests can assert how
/// far a pipeline got.
pub(crate) struct MarkerSentiment {
    calls: AtomicUsize,
}

impl MarkerSentiment {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl SentimentAnalyzer for MarkerSentiment {
    async fn classify(&self, text: &str) -> Result<Sentiment, ScoringError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let kind = if text.contains("happy") {
            SentimentKind::Positive
        } else if text.contains("sad") {
            SentimentKind::Negative
        } else {
            SentimentKind::Neutral
        };
        Ok(Sentiment {
            kind,
            confidence: 0.9,
        })
    }
}

/// Analyzer failing every call.
pub(crate) struct FailingSentiment;

#[async_trait]
impl SentimentAnalyzer for FailingSentiment {
    async fn classify(&self, _text: &str) -> Result<Sentiment, ScoringError> {
        Err(ScoringError::RequestFailed("classifier offline".to_string()))
    }
}

/// Scorer returning a fixed bias.
pub(crate) struct FixedBias(pub(crate) f64);

#[async_trait]
impl BiasScorer for FixedBias {
    async fn score(&self, _text: &str) -> Result<f64, ScoringError> {
        Ok(self.0)
    }
}

/// Scorer failing every call.
pub(crate) struct FailingBias;

#[async_trait]
impl BiasScorer for FailingBias {
    async fn score(&self, _text: &str) -> Result<f64, ScoringError> {
        Err(ScoringError::RequestFailed("bias scorer offline".to_string()))
    }
}

/// Similar exactly when the candidate mentions "topic".
pub(crate) struct MarkerSimilarity;

#[async_trait]
impl SimilarityScorer for MarkerSimilarity {
    async fn is_similar(
        &self,
        _base: &str,
        candidate: &str,
        _threshold: f64,
    ) -> Result<bool, ScoringError> {
        Ok(candidate.contains("topic"))
    }
}

/// Similarity scorer failing every call.
pub(crate) struct FailingSimilarity;

#[async_trait]
impl SimilarityScorer for FailingSimilarity {
    async fn is_similar(
        &self,
        _base: &str,
        _candidate: &str,
        _threshold: f64,
    ) -> Result<bool, ScoringError> {
        Err(ScoringError::RequestFailed("similarity offline".to_string()))
    }
}
