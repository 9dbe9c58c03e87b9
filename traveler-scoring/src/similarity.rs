//! Document similarity adapters

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ScoringError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Decides whether two documents are similar at a given threshold
///
/// The continuous score underneath is an implementation detail; callers
/// only see the predicate.
#[async_trait]
pub trait SimilarityScorer: Send + Sync {
    async fn is_similar(
        &self,
        base: &str,
        candidate: &str,
        threshold: f64,
    ) -> Result<bool, ScoringError>;
}

/// Client for the document-similarity service
///
/// Wire contract: POST `{base}/similarity` with `{"base", "candidate"}`,
/// answered by `{"similarity": f}` in [0, 1].
pub struct SimilarityServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SimilarityRequest<'a> {
    base: &'a str,
    candidate: &'a str,
}

#[derive(Debug, Deserialize)]
struct SimilarityResponse {
    similarity: f64,
}

impl SimilarityServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SimilarityScorer for SimilarityServiceClient {
    #[instrument(skip(self, base, candidate))]
    async fn is_similar(
        &self,
        base: &str,
        candidate: &str,
        threshold: f64,
    ) -> Result<bool, ScoringError> {
        let response = self
            .client
            .post(format!("{}/similarity", self.base_url))
            .json(&SimilarityRequest { base, candidate })
            .send()
            .await
            .map_err(|e| ScoringError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScoringError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: SimilarityResponse = response
            .json()
            .await
            .map_err(|e| ScoringError::Parse(e.to_string()))?;

        Ok(parsed.similarity >= threshold)
    }
}

/// In-process TF-IDF cosine similarity over the two documents
///
/// Tokens are lowercased runs of at least two word characters; IDF is
/// smoothed over the two-document corpus. Identical documents score 1.0,
/// documents sharing no vocabulary score 0.0.
pub struct TfidfSimilarity;

impl TfidfSimilarity {
    /// Continuous similarity score in [0.0, 1.0]
    pub fn score(base: &str, candidate: &str) -> f64 {
        let base_tokens = tokenize(base);
        let candidate_tokens = tokenize(candidate);
        if base_tokens.is_empty() || candidate_tokens.is_empty() {
            return 0.0;
        }

        let base_counts = term_counts(&base_tokens);
        let candidate_counts = term_counts(&candidate_tokens);

        let vocab: BTreeSet<&str> = base_counts
            .keys()
            .chain(candidate_counts.keys())
            .map(String::as_str)
            .collect();

        let mut base_vector = Vec::with_capacity(vocab.len());
        let mut candidate_vector = Vec::with_capacity(vocab.len());
        for term in vocab {
            let document_frequency = usize::from(base_counts.contains_key(term))
                + usize::from(candidate_counts.contains_key(term));
            // smoothed idf over a corpus of exactly two documents
            let idf = (3.0 / (1.0 + document_frequency as f64)).ln() + 1.0;
            base_vector.push(base_counts.get(term).copied().unwrap_or(0) as f64 * idf);
            candidate_vector.push(candidate_counts.get(term).copied().unwrap_or(0) as f64 * idf);
        }

        cosine_similarity(&base_vector, &candidate_vector)
    }
}

#[async_trait]
impl SimilarityScorer for TfidfSimilarity {
    async fn is_similar(
        &self,
        base: &str,
        candidate: &str,
        threshold: f64,
    ) -> Result<bool, ScoringError> {
        Ok(Self::score(base, candidate) >= threshold)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .map(String::from)
        .collect()
}

fn term_counts(tokens: &[String]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }
    counts
}

/// Cosine of the angle between two equal-length term vectors
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    // Avoid division by zero
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}
