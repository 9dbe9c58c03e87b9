//! Search orchestration over one provider plus the scoring adapters

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument};

use traveler_core::{
    Article, ArticleScores, EnrichedArticle, SearchQuery, Sentiment, SentimentKind,
};
use traveler_scoring::{BiasScorer, ScoringError, SentimentAnalyzer, SimilarityScorer};
use traveler_search::{SearchError, SearchProvider};

use crate::cache::ResponseCache;
use crate::collector::{collect_paginated, CollectedNews};
use crate::filter::{collect_filtered, SimilarityGate};

/// Configuration for [`SearchService`]
#[derive(Debug, Clone)]
pub struct SearchServiceConfig {
    /// Maximum provider fetches per collection run
    pub page_budget: usize,
    /// Result target for opposite-sentiment searches without an explicit count
    pub opposite_result_cap: usize,
    /// Language applied to queries that don't set one
    pub default_language: Option<String>,
    /// Whether caller similarity thresholds are honored
    pub similarity_gating: bool,
    /// Whether collection may span multiple pages; off clamps every run
    /// to a single fetch
    pub pagination: bool,
    /// How long collection results stay cached (seconds)
    pub cache_ttl_secs: u64,
    /// Cache size that triggers eviction of expired entries
    pub max_cache_entries: usize,
}

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            page_budget: 5,        // provider fetches per collection run
            opposite_result_cap: 3,
            default_language: Some("en".to_string()),
            similarity_gating: true,
            pagination: true,
            cache_ttl_secs: 600,   // search results barely move inside 10 minutes
            max_cache_entries: 256,
        }
    }
}

/// Parameters for an opposite-sentiment search
#[derive(Debug, Clone)]
pub struct OppositeSearch {
    /// Reference article text
    pub content: String,
    /// Keyword to search the provider for
    pub keyword: String,
    /// Result target; the configured cap when absent
    pub count: Option<usize>,
    /// Similarity gate threshold in [0, 1]; no gate when absent
    pub similarity_threshold: Option<f64>,
    /// Explicit allowed kinds; opposites of the reference when absent
    pub sentiment_filter: Option<Vec<SentimentKind>>,
}

/// One page of offset-addressed search results
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub articles: Vec<Article>,
    /// Offset to request the next page at; `None` at end of results
    pub next_offset: Option<usize>,
}

/// Orchestrates provider collection, filtering, and scoring.
///
/// Holds one provider and one adapter per scoring capability behind trait
/// objects, so remote services and in-process fallbacks interchange freely.
pub struct SearchService {
    provider: Arc<dyn SearchProvider>,
    sentiment: Arc<dyn SentimentAnalyzer>,
    bias: Arc<dyn BiasScorer>,
    similarity: Arc<dyn SimilarityScorer>,
    config: SearchServiceConfig,
    cache: ResponseCache,
}

impl SearchService {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        sentiment: Arc<dyn SentimentAnalyzer>,
        bias: Arc<dyn BiasScorer>,
        similarity: Arc<dyn SimilarityScorer>,
        config: SearchServiceConfig,
    ) -> Self {
        let cache = ResponseCache::new(
            Duration::from_secs(config.cache_ttl_secs),
            config.max_cache_entries,
        );
        Self {
            provider,
            sentiment,
            bias,
            similarity,
            config,
            cache,
        }
    }

    /// Name of the active provider, for health reporting
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    fn page_budget(&self) -> usize {
        if self.config.pagination {
            self.config.page_budget
        } else {
            1
        }
    }

    fn apply_default_language(&self, mut query: SearchQuery) -> SearchQuery {
        if query.language.is_none() {
            query.language = self.config.default_language.clone();
        }
        query
    }

    /// Collect `target` articles for `query` through the cache.
    async fn collect_cached(
        &self,
        query: &SearchQuery,
        target: usize,
        exact: bool,
    ) -> Result<CollectedNews, SearchServiceError> {
        let key = ResponseCache::key_for(query, target, exact);

        if let Some(hit) = self.cache.get(&key).await {
            debug!("cache hit for '{}'", query.keyword);
            return Ok(hit);
        }

        let collected = collect_paginated(
            self.provider.as_ref(),
            query,
            target,
            exact,
            self.page_budget(),
        )
        .await?;
        self.cache.insert(key, collected.clone()).await;
        Ok(collected)
    }

    /// Offset-addressed keyword search.
    ///
    /// Collects the first `offset + count` articles, serves the window at
    /// `offset`, and reports the offset of the next window while the
    /// provider still has pages.
    #[instrument(skip(self))]
    pub async fn search_page(
        &self,
        keyword: &str,
        count: usize,
        offset: usize,
    ) -> Result<SearchPage, SearchServiceError> {
        if keyword.is_empty() {
            return Err(SearchServiceError::InvalidRequest(
                "query must not be empty".to_string(),
            ));
        }
        if count == 0 {
            return Err(SearchServiceError::InvalidRequest(
                "count must be at least 1".to_string(),
            ));
        }

        let Some(target) = offset.checked_add(count) else {
            return Err(SearchServiceError::InvalidRequest(
                "offset is too large".to_string(),
            ));
        };

        let query = self.apply_default_language(SearchQuery::new(keyword));
        let collected = self.collect_cached(&query, target, true).await?;

        let has_more = collected.next_page.is_some();
        let articles: Vec<Article> = collected.articles.into_iter().skip(offset).collect();
        let next_offset = if has_more {
            Some(offset + articles.len())
        } else {
            None
        };

        info!(
            "search '{}' returned {} articles at offset {}",
            keyword,
            articles.len(),
            offset
        );

        Ok(SearchPage {
            articles,
            next_offset,
        })
    }

    /// Find articles about `keyword` whose sentiment differs from the
    /// reference content's.
    #[instrument(skip(self, request), fields(keyword = %request.keyword))]
    pub async fn opposite_sentiment_news(
        &self,
        request: &OppositeSearch,
    ) -> Result<Vec<EnrichedArticle>, SearchServiceError> {
        if request.content.is_empty() {
            return Err(SearchServiceError::InvalidRequest(
                "content must not be empty".to_string(),
            ));
        }
        if request.keyword.is_empty() {
            return Err(SearchServiceError::InvalidRequest(
                "keyword must not be empty".to_string(),
            ));
        }
        if request.count == Some(0) {
            return Err(SearchServiceError::InvalidRequest(
                "count must be at least 1".to_string(),
            ));
        }
        if let Some(threshold) = request.similarity_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(SearchServiceError::InvalidRequest(
                    "similarityThreshold must be between 0 and 1".to_string(),
                ));
            }
        }
        if let Some(filter) = &request.sentiment_filter {
            if filter.is_empty() {
                return Err(SearchServiceError::InvalidRequest(
                    "sentimentFilter must not be empty".to_string(),
                ));
            }
        }

        let reference = self.sentiment.classify(&request.content).await?;
        debug!("reference content classified {}", reference.kind);

        let allowed = match &request.sentiment_filter {
            Some(filter) => filter.clone(),
            None => reference.kind.opposites(),
        };

        let gate = match request.similarity_threshold {
            Some(threshold) if self.config.similarity_gating => Some(SimilarityGate {
                scorer: self.similarity.as_ref(),
                base: &request.content,
                threshold,
            }),
            _ => None,
        };

        let target = request.count.unwrap_or(self.config.opposite_result_cap);
        let query = self.apply_default_language(SearchQuery::new(request.keyword.as_str()));

        let results = collect_filtered(
            self.provider.as_ref(),
            &query,
            target,
            self.page_budget(),
            self.sentiment.as_ref(),
            gate.as_ref(),
            &allowed,
        )
        .await?;

        info!(
            "opposite-sentiment search '{}' matched {} of target {}",
            request.keyword,
            results.len(),
            target
        );

        Ok(results)
    }

    /// Classify the sentiment of a piece of text.
    #[instrument(skip(self, text))]
    pub async fn classify_sentiment(&self, text: &str) -> Result<Sentiment, SearchServiceError> {
        if text.is_empty() {
            return Err(SearchServiceError::InvalidRequest(
                "content must not be empty".to_string(),
            ));
        }
        Ok(self.sentiment.classify(text).await?)
    }

    /// Score the political bias of a piece of text.
    #[instrument(skip(self, text))]
    pub async fn score_bias(&self, text: &str) -> Result<f64, SearchServiceError> {
        if text.is_empty() {
            return Err(SearchServiceError::InvalidRequest(
                "content must not be empty".to_string(),
            ));
        }
        Ok(self.bias.score(text).await?)
    }

    /// Score sentiment and bias for the same text.
    ///
    /// The two adapter calls run concurrently and fail independently; when
    /// either fails, whatever the other produced is reported alongside the
    /// error instead of being thrown away.
    #[instrument(skip(self, text))]
    pub async fn score_article(&self, text: &str) -> Result<ArticleScores, SearchServiceError> {
        if text.is_empty() {
            return Err(SearchServiceError::InvalidRequest(
                "content must not be empty".to_string(),
            ));
        }

        let (sentiment, bias) = tokio::join!(self.sentiment.classify(text), self.bias.score(text));

        match (sentiment, bias) {
            (Ok(sentiment), Ok(bias)) => Ok(ArticleScores { sentiment, bias }),
            (sentiment, bias) => {
                let mut failures = Vec::new();
                if let Err(e) = &sentiment {
                    failures.push(format!("sentiment: {}", e));
                }
                if let Err(e) = &bias {
                    failures.push(format!("bias: {}", e));
                }
                Err(SearchServiceError::PartialScores(ScoreArticleError {
                    sentiment: sentiment.ok(),
                    bias: bias.ok(),
                    message: failures.join("; "),
                }))
            }
        }
    }
}

/// Failure of combined scoring, carrying whichever sub-call succeeded
#[derive(Debug, Clone)]
pub struct ScoreArticleError {
    pub sentiment: Option<Sentiment>,
    pub bias: Option<f64>,
    /// Names exactly the sub-call(s) that failed
    pub message: String,
}

impl std::fmt::Display for ScoreArticleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Search service errors
#[derive(Debug, thiserror::Error)]
pub enum SearchServiceError {
    /// The caller's parameters were unusable
    #[error("{0}")]
    InvalidRequest(String),

    /// The news provider failed
    #[error("provider error: {0}")]
    Provider(#[from] SearchError),

    /// A scoring adapter failed
    #[error("scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Combined scoring failed on at least one side
    #[error("{0}")]
    PartialScores(ScoreArticleError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        page, raw, FailingBias, FailingSentiment, FixedBias, MarkerSentiment, MarkerSimilarity,
        ScriptedProvider,
    };

    fn raws(tags: &[&str]) -> Vec<traveler_search::RawArticle> {
        tags.iter().map(|t| raw(t, "some words")).collect()
    }

    fn service_over(provider: Arc<ScriptedProvider>, config: SearchServiceConfig) -> SearchService {
        SearchService::new(
            provider,
            Arc::new(MarkerSentiment::new()),
            Arc::new(FixedBias(0.25)),
            Arc::new(MarkerSimilarity),
            config,
        )
    }

    #[tokio::test]
    async fn test_search_page_returns_offset_window() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            page(raws(&["a1", "a2", "a3", "a4", "a5", "a6", "a7", "a8"]), Some(1)),
            page(raws(&["b1", "b2", "b3", "b4"]), Some(2)),
        ]));
        let service = service_over(provider.clone(), SearchServiceConfig::default());

        let result = service.search_page("bitcoin", 5, 5).await.unwrap();

        assert_eq!(result.articles.len(), 5);
        assert_eq!(result.articles[0].url, "https://example.com/a6");
        assert_eq!(result.articles[4].url, "https://example.com/b2");
        assert_eq!(result.next_offset, Some(10));
    }

    #[tokio::test]
    async fn test_search_page_reports_end_of_results() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(
            raws(&["a1", "a2", "a3"]),
            None,
        )]));
        let service = service_over(provider, SearchServiceConfig::default());

        let result = service.search_page("bitcoin", 10, 0).await.unwrap();
        assert_eq!(result.articles.len(), 3);
        assert_eq!(result.next_offset, None);

        // Offset past the end of an exhausted provider yields an empty page.
        let past_end = service.search_page("bitcoin", 10, 5).await.unwrap();
        assert!(past_end.articles.is_empty());
        assert_eq!(past_end.next_offset, None);
    }

    #[tokio::test]
    async fn test_search_page_serves_repeat_from_cache() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(
            raws(&["a1", "a2", "a3", "a4", "a5"]),
            None,
        )]));
        let service = service_over(provider.clone(), SearchServiceConfig::default());

        let first = service.search_page("bitcoin", 5, 0).await.unwrap();
        let second = service.search_page("bitcoin", 5, 0).await.unwrap();

        assert_eq!(first.articles.len(), second.articles.len());
        assert_eq!(provider.fetch_count(), 1, "repeat request hits the cache");
    }

    #[tokio::test]
    async fn test_search_page_rejects_bad_parameters() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let service = service_over(provider.clone(), SearchServiceConfig::default());

        let empty = service.search_page("", 5, 0).await;
        assert!(matches!(empty, Err(SearchServiceError::InvalidRequest(_))));

        let zero = service.search_page("bitcoin", 0, 0).await;
        assert!(matches!(zero, Err(SearchServiceError::InvalidRequest(_))));

        // offset + count must not wrap
        let overflow = service.search_page("bitcoin", 1, usize::MAX).await;
        assert!(matches!(
            overflow,
            Err(SearchServiceError::InvalidRequest(_))
        ));

        assert_eq!(provider.fetch_count(), 0, "rejected before any fetch");
    }

    #[tokio::test]
    async fn test_pagination_flag_limits_to_single_fetch() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            page(raws(&["a1", "a2", "a3", "a4", "a5"]), Some(1)),
            page(raws(&["b1", "b2", "b3", "b4", "b5"]), Some(2)),
        ]));
        let config = SearchServiceConfig {
            pagination: false,
            ..Default::default()
        };
        let service = service_over(provider.clone(), config);

        let result = service.search_page("bitcoin", 8, 0).await.unwrap();

        assert_eq!(provider.fetch_count(), 1);
        assert_eq!(result.articles.len(), 5, "one page is all we serve");
        assert_eq!(result.next_offset, None);
    }

    #[tokio::test]
    async fn test_opposite_sentiment_caps_and_preserves_order() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(
            vec![
                raw("a", "happy days ahead"),
                raw("b", "sad and grim"),
                raw("c", "a plain report"),
                raw("d", "happy outcome"),
                raw("e", "happy extra"),
            ],
            None,
        )]));
        let service = service_over(provider, SearchServiceConfig::default());

        let request = OppositeSearch {
            content: "what a sad story".to_string(),
            keyword: "economy".to_string(),
            count: None,
            similarity_threshold: None,
            sentiment_filter: None,
        };
        let results = service.opposite_sentiment_news(&request).await.unwrap();

        let urls: Vec<&str> = results.iter().map(|r| r.article.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/a",
                "https://example.com/c",
                "https://example.com/d"
            ],
            "three non-negative articles in provider order"
        );
        assert!(results.iter().all(|r| r.bias.is_none()));
    }

    #[tokio::test]
    async fn test_opposite_sentiment_honors_explicit_filter() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(
            vec![
                raw("a", "happy days"),
                raw("b", "sad and grim"),
                raw("c", "a plain report"),
            ],
            None,
        )]));
        let service = service_over(provider, SearchServiceConfig::default());

        let request = OppositeSearch {
            content: "what a sad story".to_string(),
            keyword: "economy".to_string(),
            count: None,
            similarity_threshold: None,
            sentiment_filter: Some(vec![SentimentKind::Negative]),
        };
        let results = service.opposite_sentiment_news(&request).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].article.url, "https://example.com/b");
        assert_eq!(results[0].sentiment.kind, SentimentKind::Negative);
    }

    #[tokio::test]
    async fn test_opposite_sentiment_threshold_gates_candidates() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(
            vec![
                raw("a", "happy about the topic"),
                raw("b", "happy but unrelated"),
            ],
            None,
        )]));
        let service = service_over(provider, SearchServiceConfig::default());

        let request = OppositeSearch {
            content: "a sad report".to_string(),
            keyword: "economy".to_string(),
            count: None,
            similarity_threshold: Some(0.8),
            sentiment_filter: None,
        };
        let results = service.opposite_sentiment_news(&request).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].article.url, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_opposite_sentiment_gate_off_when_disabled() {
        let provider = Arc::new(ScriptedProvider::new(vec![page(
            vec![
                raw("a", "happy about the topic"),
                raw("b", "happy but unrelated"),
            ],
            None,
        )]));
        let config = SearchServiceConfig {
            similarity_gating: false,
            ..Default::default()
        };
        let service = service_over(provider, config);

        let request = OppositeSearch {
            content: "a sad report".to_string(),
            keyword: "economy".to_string(),
            count: None,
            similarity_threshold: Some(0.8),
            sentiment_filter: None,
        };
        let results = service.opposite_sentiment_news(&request).await.unwrap();

        assert_eq!(results.len(), 2, "threshold ignored without the capability");
    }

    #[tokio::test]
    async fn test_opposite_sentiment_rejects_bad_parameters() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let service = service_over(provider, SearchServiceConfig::default());

        let bad_threshold = OppositeSearch {
            content: "text".to_string(),
            keyword: "economy".to_string(),
            count: None,
            similarity_threshold: Some(1.5),
            sentiment_filter: None,
        };
        assert!(matches!(
            service.opposite_sentiment_news(&bad_threshold).await,
            Err(SearchServiceError::InvalidRequest(_))
        ));

        let no_content = OppositeSearch {
            content: String::new(),
            keyword: "economy".to_string(),
            count: None,
            similarity_threshold: None,
            sentiment_filter: None,
        };
        assert!(matches!(
            service.opposite_sentiment_news(&no_content).await,
            Err(SearchServiceError::InvalidRequest(_))
        ));

        let zero_count = OppositeSearch {
            content: "text".to_string(),
            keyword: "economy".to_string(),
            count: Some(0),
            similarity_threshold: None,
            sentiment_filter: None,
        };
        assert!(matches!(
            service.opposite_sentiment_news(&zero_count).await,
            Err(SearchServiceError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_score_article_combines_both() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let service = service_over(provider, SearchServiceConfig::default());

        let scores = service.score_article("a happy take").await.unwrap();
        assert_eq!(scores.sentiment.kind, SentimentKind::Positive);
        assert!((scores.bias - 0.25).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_score_article_reports_partial_on_bias_failure() {
        let service = SearchService::new(
            Arc::new(ScriptedProvider::new(vec![])),
            Arc::new(MarkerSentiment::new()),
            Arc::new(FailingBias),
            Arc::new(MarkerSimilarity),
            SearchServiceConfig::default(),
        );

        let err = service.score_article("a happy take").await.unwrap_err();
        match err {
            SearchServiceError::PartialScores(partial) => {
                assert_eq!(
                    partial.sentiment.as_ref().map(|s| s.kind),
                    Some(SentimentKind::Positive),
                    "surviving sub-result is kept"
                );
                assert_eq!(partial.bias, None);
                assert!(partial.message.contains("bias"));
                assert!(!partial.message.contains("sentiment"));
            }
            other => panic!("expected PartialScores, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_score_article_reports_both_failures() {
        let service = SearchService::new(
            Arc::new(ScriptedProvider::new(vec![])),
            Arc::new(FailingSentiment),
            Arc::new(FailingBias),
            Arc::new(MarkerSimilarity),
            SearchServiceConfig::default(),
        );

        let err = service.score_article("a happy take").await.unwrap_err();
        match err {
            SearchServiceError::PartialScores(partial) => {
                assert_eq!(partial.sentiment, None);
                assert_eq!(partial.bias, None);
                assert_eq!(
                    partial.message,
                    "sentiment: request failed: classifier offline; \
                     bias: request failed: bias scorer offline"
                );
            }
            other => panic!("expected PartialScores, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_single_scores_reject_empty_text() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let service = service_over(provider, SearchServiceConfig::default());

        assert!(matches!(
            service.classify_sentiment("").await,
            Err(SearchServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.score_bias("").await,
            Err(SearchServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            service.score_article("").await,
            Err(SearchServiceError::InvalidRequest(_))
        ));
    }
}
