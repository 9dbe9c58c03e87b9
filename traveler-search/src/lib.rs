//! News search provider clients
//!
//! Wraps the external news-search APIs (NewsData.io and NewsAPI.org) behind
//! a common [`SearchProvider`] trait and normalizes their wire formats into
//! the canonical [`Article`](traveler_core::Article) shape.

pub mod error;
pub mod keys;
pub mod newsapi;
pub mod newsdata;
pub mod normalize;
pub mod provider;

pub use error::SearchError;
pub use keys::KeyPool;
pub use newsapi::NewsApiClient;
pub use newsdata::NewsDataClient;
pub use normalize::normalize;
pub use provider::{ProviderPage, RawArticle, SearchProvider, PAGE_SIZE};
