//! Error types for the scoring adapters

use thiserror::Error;

/// Errors from sentiment, bias, or similarity scoring
///
/// Adapter calls are never retried; any of these is terminal for the
/// operation that made the call.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// HTTP request failed before a response arrived
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Scoring API returned an error response
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse a scoring API response
    #[error("parse error: {0}")]
    Parse(String),
}
