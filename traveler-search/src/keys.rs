//! API key pool with round-robin selection

use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

/// Rotates through a set of API credentials so repeated requests spread
/// their rate-limit cost across every configured key.
///
/// Selection order is an implementation detail and never affects results;
/// the cursor starts at a random key so restarts don't always drain the
/// first one.
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<String>,
    next: AtomicUsize,
}

impl KeyPool {
    /// Build a pool from a list of keys; `None` when the list is empty
    pub fn new(keys: Vec<String>) -> Option<Self> {
        if keys.is_empty() {
            return None;
        }
        let start = rand::rng().random_range(0..keys.len());
        Some(Self {
            keys,
            next: AtomicUsize::new(start),
        })
    }

    /// Build a pool from a comma-separated list, ignoring empty segments
    pub fn from_csv(raw: &str) -> Option<Self> {
        let keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect();
        Self::new(keys)
    }

    /// Next key in round-robin order
    pub fn next_key(&self) -> &str {
        let idx = self.next.fetch_add(1, Ordering::Relaxed) % self.keys.len();
        &self.keys[idx]
    }

    /// Number of keys in the pool (always at least one)
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}
