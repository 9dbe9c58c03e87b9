//! Error types for the search module

use thiserror::Error;

/// Errors that can occur while talking to a news-search provider
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed before a response arrived
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Provider returned an error response
    #[error("provider error (status {status}): {message}")]
    Provider {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },

    /// Failed to parse a provider response
    #[error("parse error: {0}")]
    Parse(String),
}
