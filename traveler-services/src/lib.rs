//! Orchestration services for the News Traveler backend
//!
//! Home of the pagination collector, the streaming sentiment/similarity
//! filter, the response cache, and the search service that ties providers
//! and scoring adapters together.

pub mod cache;
pub mod collector;
pub mod filter;
pub mod search_service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::ResponseCache;
pub use collector::{collect_paginated, CollectedNews};
pub use filter::{collect_filtered, SimilarityGate};
pub use search_service::{
    OppositeSearch, ScoreArticleError, SearchPage, SearchService, SearchServiceConfig,
    SearchServiceError,
};
