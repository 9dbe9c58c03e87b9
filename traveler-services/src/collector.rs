//! Budget-bounded paginated collection from a search provider

use std::collections::HashSet;

use tracing::debug;

use traveler_core::{Article, SearchQuery};
use traveler_search::{normalize, SearchError, SearchProvider};

/// Result of one collection run.
#[derive(Debug, Clone, Default)]
pub struct CollectedNews {
    /// Normalized, deduplicated articles in provider order.
    pub articles: Vec<Article>,
    /// Token to resume after the last consumed page. `None` when the
    /// provider ran out before `target` was met.
    pub next_page: Option<String>,
}

/// Accumulate normalized articles until `target` is reached, the provider
/// runs out of pages, or `budget` pages have been fetched.
///
/// A provider error aborts the whole run with no partial results. With
/// `exact` set the output is truncated to exactly `target`; overshoot is
/// normal since providers serve fixed-size pages. Duplicate urls keep
/// their first occurrence. `next_page` is `None` whenever fewer than
/// `target` articles came back, so callers can tell end-of-results from
/// try-again.
pub async fn collect_paginated<P>(
    provider: &P,
    query: &SearchQuery,
    target: usize,
    exact: bool,
    budget: usize,
) -> Result<CollectedNews, SearchError>
where
    P: SearchProvider + ?Sized,
{
    let mut working = query.clone();
    let mut articles: Vec<Article> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();
    let mut next_page: Option<String> = None;

    let mut fetches = 0usize;
    while articles.len() < target && fetches < budget {
        fetches += 1;
        let page = provider.fetch_page(&working).await?;

        for raw in page.articles {
            if let Some(article) = normalize(raw) {
                if seen_urls.insert(article.url.clone()) {
                    articles.push(article);
                }
            }
        }

        match page.next_page {
            Some(token) if !token.is_empty() => {
                working.page = Some(token.clone());
                next_page = Some(token);
            }
            _ => {
                next_page = None;
                break;
            }
        }
    }

    debug!(
        "collected {} articles in {} fetches (target {})",
        articles.len(),
        fetches,
        target
    );

    if articles.len() < target {
        next_page = None;
    }
    if exact {
        articles.truncate(target);
    }

    Ok(CollectedNews {
        articles,
        next_page,
    })
}
