//! TTL cache for collection results

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use traveler_core::SearchQuery;

use crate::collector::CollectedNews;

/// Cache entry with expiration.
struct CacheEntry {
    data: CollectedNews,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: CollectedNews, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// In-memory TTL cache for collection results.
///
/// Keyed by the full query plus the collection parameters, so two requests
/// share an entry only when they would have produced identical output.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            max_entries,
        }
    }

    /// Cache key for one collection run.
    pub fn key_for(query: &SearchQuery, target: usize, exact: bool) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}|{}|{}|{}|{}",
            query.keyword,
            query.language.as_deref().unwrap_or(""),
            query.country.as_deref().unwrap_or(""),
            query.category.as_deref().unwrap_or(""),
            query.domain.as_deref().unwrap_or(""),
            query.from_date.map(|d| d.to_string()).unwrap_or_default(),
            query.to_date.map(|d| d.to_string()).unwrap_or_default(),
            query.page.as_deref().unwrap_or(""),
            target,
            exact,
        )
    }

    pub async fn get(&self, key: &str) -> Option<CollectedNews> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.data.clone())
    }

    pub async fn insert(&self, key: String, data: CollectedNews) {
        let mut entries = self.entries.write().await;
        if entries.len() >= self.max_entries {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired());
            debug!("evicted {} expired cache entries", before - entries.len());
        }
        entries.insert(key, CacheEntry::new(data, self.ttl));
    }
}
