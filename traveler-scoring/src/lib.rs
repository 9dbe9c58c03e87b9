//! Scoring adapters for the News Traveler backend
//!
//! Three pluggable capabilities sit behind traits here: sentiment
//! classification, political-bias scoring, and document similarity. Each
//! ships in two flavors with identical contracts: a client for the remote
//! scoring service and a deterministic in-process fallback, so the full
//! pipeline runs with or without the external services configured.

pub mod bias;
pub mod error;
pub mod sentiment;
pub mod similarity;

pub use bias::{BiasScorer, BipartisanPressClient, DigestBias};
pub use error::ScoringError;
pub use sentiment::{LexiconSentiment, SentimentAnalyzer, SentimentServiceClient};
pub use similarity::{SimilarityScorer, SimilarityServiceClient, TfidfSimilarity};
