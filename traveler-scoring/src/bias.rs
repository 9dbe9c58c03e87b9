//! Political-bias scoring adapters

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::error::ScoringError;

const BIAS_API_BASE: &str = "https://api.thebipartisanpress.com";
// Bias scoring is the slowest of the three services
const REQUEST_TIMEOUT_SECS: u64 = 20;
/// The raw API scores span [-42, 42]; dividing lands them in [-1, 1]
const BIAS_SCALE: f64 = 42.0;

/// Scores the political bias of a piece of text
#[async_trait]
pub trait BiasScorer: Send + Sync {
    /// Bias in [-1.0, 1.0]; negative leans left, positive leans right
    async fn score(&self, text: &str) -> Result<f64, ScoringError>;
}

/// Client for the Bipartisan Press political-bias API
///
/// The API takes a form post of `API` (the credential) and `Text`, and
/// answers with the raw score as plain text.
pub struct BipartisanPressClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl BipartisanPressClient {
    pub fn new(api_key: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            base_url: BIAS_API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl BiasScorer for BipartisanPressClient {
    #[instrument(skip(self, text))]
    async fn score(&self, text: &str) -> Result<f64, ScoringError> {
        let form = [("API", self.api_key.as_str()), ("Text", text)];

        let response = self
            .client
            .post(format!("{}/api/endpoints/beta/robert", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| ScoringError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScoringError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(ScoringError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let raw: f64 = body.trim().parse().map_err(|_| {
            ScoringError::Parse(format!("non-numeric bias response: {}", body.trim()))
        })?;

        Ok(raw / BIAS_SCALE)
    }
}

/// Deterministic stand-in scorer: a digest of the text scaled into [-1, 1]
///
/// The value carries no meaning beyond being stable per text, which keeps
/// the full pipeline runnable without a Bipartisan Press credential.
pub struct DigestBias;

impl DigestBias {
    fn score_text(text: &str) -> f64 {
        let digest = Sha256::digest(text.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        let value = u64::from_be_bytes(bytes);
        (value % 100) as f64 / 50.0 - 1.0
    }
}

#[async_trait]
impl BiasScorer for DigestBias {
    async fn score(&self, text: &str) -> Result<f64, ScoringError> {
        Ok(Self::score_text(text))
    }
}
