//! Streaming similarity and sentiment filter over provider pages

use std::collections::HashSet;

use tracing::debug;

use traveler_core::{EnrichedArticle, SearchQuery, SentimentKind};
use traveler_scoring::{SentimentAnalyzer, SimilarityScorer};
use traveler_search::{normalize, SearchProvider};

use crate::search_service::SearchServiceError;

/// Similarity gate applied before sentiment classification.
pub struct SimilarityGate<'a> {
    pub scorer: &'a dyn SimilarityScorer,
    /// Reference document candidates are compared against.
    pub base: &'a str,
    /// Minimum similarity for a candidate to pass.
    pub threshold: f64,
}

/// Accumulate enriched articles matching the filter until `target` matches
/// are found, the provider runs out of pages, or `budget` pages have been
/// fetched.
///
/// Each candidate passes the similarity gate (when one is given) before it
/// is classified; articles the gate rejects are never sent to the
/// classifier. Output preserves provider order and never exceeds `target`.
/// A provider error aborts the run with no partial results, and so does
/// any adapter error.
pub async fn collect_filtered<P>(
    provider: &P,
    query: &SearchQuery,
    target: usize,
    budget: usize,
    sentiment: &dyn SentimentAnalyzer,
    gate: Option<&SimilarityGate<'_>>,
    allowed: &[SentimentKind],
) -> Result<Vec<EnrichedArticle>, SearchServiceError>
where
    P: SearchProvider + ?Sized,
{
    let mut working = query.clone();
    let mut matches: Vec<EnrichedArticle> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    let mut fetches = 0usize;
    'pages: while matches.len() < target && fetches < budget {
        fetches += 1;
        let page = provider.fetch_page(&working).await?;

        for candidate in page.articles {
            let Some(article) = normalize(candidate) else {
                continue;
            };
            if !seen_urls.insert(article.url.clone()) {
                continue;
            }
            if let Some(gate) = gate {
                let similar = gate
                    .scorer
                    .is_similar(gate.base, &article.content, gate.threshold)
                    .await?;
                if !similar {
                    continue;
                }
            }
            let sentiment = sentiment.classify(&article.content).await?;
            if !allowed.contains(&sentiment.kind) {
                continue;
            }
            matches.push(EnrichedArticle {
                article,
                sentiment,
                bias: None,
            });
            if matches.len() >= target {
                break 'pages;
            }
        }

        match page.next_page {
            Some(token) if !token.is_empty() => working.page = Some(token),
            _ => break,
        }
    }

    debug!(
        "filter matched {} of target {} in {} fetches",
        matches.len(),
        target,
        fetches
    );

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        page, raw, FailingSentiment, FailingSimilarity, MarkerSentiment, MarkerSimilarity,
        ScriptedProvider,
    };

    const OPPOSITES_OF_NEGATIVE: &[SentimentKind] =
        &[SentimentKind::Positive, SentimentKind::Neutral];

    #[tokio::test]
    async fn test_matches_preserve_provider_order() {
        let provider = ScriptedProvider::new(vec![page(
            vec![
                raw("a", "happy news"),
                raw("b", "sad news"),
                raw("c", "plain report"),
                raw("d", "happy again"),
            ],
            None,
        )]);
        let sentiment = MarkerSentiment::new();

        let matches = collect_filtered(
            &provider,
            &SearchQuery::new("test"),
            10,
            5,
            &sentiment,
            None,
            OPPOSITES_OF_NEGATIVE,
        )
        .await
        .unwrap();

        let urls: Vec<&str> = matches.iter().map(|m| m.article.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/a",
                "https://example.com/c",
                "https://example.com/d"
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_classifying_once_target_met() {
        let provider = ScriptedProvider::new(vec![page(
            vec![
                raw("a", "happy one"),
                raw("b", "sad one"),
                raw("c", "happy two"),
                raw("d", "happy three"),
                raw("e", "happy four"),
            ],
            None,
        )]);
        let sentiment = MarkerSentiment::new();

        let matches = collect_filtered(
            &provider,
            &SearchQuery::new("test"),
            2,
            5,
            &sentiment,
            None,
            &[SentimentKind::Positive],
        )
        .await
        .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(
            sentiment.call_count(),
            3,
            "classification stops right after the target is met"
        );
    }

    #[tokio::test]
    async fn test_gate_runs_before_classifier() {
        let provider = ScriptedProvider::new(vec![page(
            vec![
                raw("a", "happy about the topic"),
                raw("b", "happy but unrelated"),
            ],
            None,
        )]);
        let sentiment = MarkerSentiment::new();
        let scorer = MarkerSimilarity;
        let gate = SimilarityGate {
            scorer: &scorer,
            base: "reference",
            threshold: 0.5,
        };

        let matches = collect_filtered(
            &provider,
            &SearchQuery::new("test"),
            10,
            5,
            &sentiment,
            Some(&gate),
            &[SentimentKind::Positive],
        )
        .await
        .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].article.url, "https://example.com/a");
        assert_eq!(
            sentiment.call_count(),
            1,
            "gated-out articles never reach the classifier"
        );
    }

    #[tokio::test]
    async fn test_classifier_error_aborts() {
        let provider =
            ScriptedProvider::new(vec![page(vec![raw("a", "happy news")], None)]);

        let result = collect_filtered(
            &provider,
            &SearchQuery::new("test"),
            3,
            5,
            &FailingSentiment,
            None,
            OPPOSITES_OF_NEGATIVE,
        )
        .await;

        assert!(matches!(result, Err(SearchServiceError::Scoring(_))));
    }

    #[tokio::test]
    async fn test_similarity_error_aborts() {
        let provider =
            ScriptedProvider::new(vec![page(vec![raw("a", "happy news")], None)]);
        let sentiment = MarkerSentiment::new();
        let scorer = FailingSimilarity;
        let gate = SimilarityGate {
            scorer: &scorer,
            base: "reference",
            threshold: 0.5,
        };

        let result = collect_filtered(
            &provider,
            &SearchQuery::new("test"),
            3,
            5,
            &sentiment,
            Some(&gate),
            OPPOSITES_OF_NEGATIVE,
        )
        .await;

        assert!(matches!(result, Err(SearchServiceError::Scoring(_))));
        assert_eq!(sentiment.call_count(), 0);
    }

    #[tokio::test]
    async fn test_respects_page_budget_without_matches() {
        let pages = (0..10)
            .map(|i| page(vec![raw(&format!("p{}", i), "sad story")], Some(i + 1)))
            .collect();
        let provider = ScriptedProvider::new(pages);
        let sentiment = MarkerSentiment::new();

        let matches = collect_filtered(
            &provider,
            &SearchQuery::new("test"),
            3,
            5,
            &sentiment,
            None,
            &[SentimentKind::Positive],
        )
        .await
        .unwrap();

        assert!(matches.is_empty());
        assert_eq!(provider.fetch_count(), 5);
    }
}
