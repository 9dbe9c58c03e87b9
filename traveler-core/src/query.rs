//! Provider search query parameters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Parameters for a provider news search
///
/// Only `keyword` is required; every other field narrows the search when
/// present. Providers apply the filters they support and ignore the rest.
/// `page` carries the opaque continuation token from a previous provider
/// response; the pagination loop advances it between fetches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search keyword or phrase
    pub keyword: String,
    /// ISO language code (e.g., "en")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Country filter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Category filter (e.g., "politics")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Restrict results to a publisher domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Earliest publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    /// Latest publication date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
    /// Opaque continuation token from a previous page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

impl SearchQuery {
    /// Create a query for a keyword with no filters
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Set the language filter
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}
