//! Canonical article shapes shared across the backend

use serde::{Deserialize, Serialize};

use crate::sentiment::Sentiment;

/// A normalized news article
///
/// Produced only by the search-layer normalizer; the required fields are
/// guaranteed non-empty by the time a value of this type exists, so no
/// response ever carries a blank title, content, or url.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Identifier of the outlet that published the article
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Author name(s), comma-joined when a provider reports several;
    /// the normalizer falls back to the source identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Article title
    pub title: String,
    /// Article text: the longer of the provider's description and body
    pub content: String,
    /// Link to the article
    pub url: String,
    /// Thumbnail/preview image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Publication timestamp as reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

/// An article with its sentiment classification attached
///
/// The filtered-search endpoints return these; `bias` is present only when
/// bias scoring ran for the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    #[serde(flatten)]
    pub article: Article,
    /// Sentiment of the article content
    pub sentiment: Sentiment,
    /// Political-bias score in [-1.0, 1.0]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bias: Option<f64>,
}

/// Combined scores for a single piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleScores {
    pub sentiment: Sentiment,
    /// Political-bias score in [-1.0, 1.0]
    pub bias: f64,
}
