//! Sentiment classification adapters

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use traveler_core::{Sentiment, SentimentKind};

use crate::error::ScoringError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Classifies the sentiment of a piece of text
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, ScoringError>;
}

/// Client for the sentiment-analysis service
///
/// Wire contract: POST `{base}/sentiment` with `{"content": ...}`, answered
/// by `{"label": "POS"|"NEU"|"NEG", "score": f}` where `score` is the
/// classifier's confidence in the label.
pub struct SentimentServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SentimentRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    label: String,
    score: f64,
}

impl SentimentServiceClient {
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
impl SentimentAnalyzer for SentimentServiceClient {
    #[instrument(skip(self, text))]
    async fn classify(&self, text: &str) -> Result<Sentiment, ScoringError> {
        let response = self
            .client
            .post(format!("{}/sentiment", self.base_url))
            .json(&SentimentRequest { content: text })
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

        let parsed: SentimentResponse = response
            .json()
            .await
            .map_err(|e| ScoringError::Parse(e.to_string()))?;

        let kind = match parsed.label.as_str() {
            "POS" => SentimentKind::Positive,
            "NEU" => SentimentKind::Neutral,
            "NEG" => SentimentKind::Negative,
            other => {
                return Err(ScoringError::Parse(format!(
                    "unknown sentiment label: {}",
                    other
                )))
            }
        };

        Ok(Sentiment {
            kind,
            confidence: parsed.score,
        })
    }
}

/// Deterministic in-process classifier backed by fixed polarity word lists
///
/// Counts positive and negative tokens and classifies on their balance,
/// with the same ±0.05 neutral band the remote classifier draws its labels
/// from. Useful as the no-credential fallback and in tests.
pub struct LexiconSentiment;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "positive", "success", "successful", "win", "wins", "won",
    "growth", "strong", "boost", "gain", "gains", "hope", "hopeful", "improve", "improved",
    "progress", "breakthrough", "record", "rally", "support", "agree", "celebrate", "optimism",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "negative", "failure", "fail", "fails", "loss", "losses", "lost",
    "weak", "crisis", "decline", "drop", "fear", "fears", "worse", "worst", "damage", "threat",
    "collapse", "crash", "conflict", "oppose", "warn", "warning",
];

impl LexiconSentiment {
    fn classify_text(text: &str) -> Sentiment {
        let mut positive = 0usize;
        let mut negative = 0usize;
        let mut total = 0usize;

        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            total += 1;
            let lower = token.to_lowercase();
            if POSITIVE_WORDS.contains(&lower.as_str()) {
                positive += 1;
            } else if NEGATIVE_WORDS.contains(&lower.as_str()) {
                negative += 1;
            }
        }

        let polar = positive + negative;
        let balance = if polar == 0 {
            0.0
        } else {
            (positive as f64 - negative as f64) / polar as f64
        };

        // balance only leaves the neutral band when polar > 0, so the
        // polarized branches never divide by zero
        if balance >= 0.05 {
            Sentiment {
                kind: SentimentKind::Positive,
                confidence: positive as f64 / polar as f64,
            }
        } else if balance <= -0.05 {
            Sentiment {
                kind: SentimentKind::Negative,
                confidence: negative as f64 / polar as f64,
            }
        } else {
            let confidence = if total == 0 {
                1.0
            } else {
                1.0 - polar as f64 / total as f64
            };
            Sentiment {
                kind: SentimentKind::Neutral,
                confidence,
            }
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconSentiment {
    async fn classify(&self, text: &str) -> Result<Sentiment, ScoringError> {
        Ok(Self::classify_text(text))
    }
}
