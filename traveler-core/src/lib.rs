//! Core types for the News Traveler backend
//!
//! This crate defines the shared data structures used across the backend:
//! the canonical article shape produced by normalization, sentiment
//! classifications, and provider search queries.

pub mod article;
pub mod query;
pub mod sentiment;

pub use article::{Article, ArticleScores, EnrichedArticle};
pub use query::SearchQuery;
pub use sentiment::{Sentiment, SentimentKind};
