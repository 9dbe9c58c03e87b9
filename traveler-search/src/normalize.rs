//! Raw-article normalization into the canonical shape

use traveler_core::Article;

use crate::provider::RawArticle;

/// Normalize a raw provider record into a canonical [`Article`].
///
/// Returns `None` when the record is unusable: missing or empty title,
/// missing or empty url, or neither content field present. When both
/// description and body are present the one with more characters wins and
/// ties keep the description. A missing author falls back to the source
/// identifier. Optional fields that arrive as empty strings become `None`.
///
/// Pure and idempotent: feeding an already-normalized record back through
/// produces the same article.
pub fn normalize(raw: RawArticle) -> Option<Article> {
    let title = non_empty(raw.title)?;
    let url = non_empty(raw.url)?;

    let description = non_empty(raw.description);
    let body = non_empty(raw.body);
    let content = match (description, body) {
        (Some(description), Some(body)) => {
            if body.chars().count() > description.chars().count() {
                body
            } else {
                description
            }
        }
        (Some(description), None) => description,
        (None, Some(body)) => body,
        (None, None) => return None,
    };

    let source = non_empty(raw.source);
    let author = non_empty(raw.author).or_else(|| source.clone());

    Some(Article {
        source,
        author,
        title,
        content,
        url,
        image_url: non_empty(raw.image_url),
        published_at: non_empty(raw.published_at),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
