//! Sentiment classification types

use serde::{Deserialize, Serialize};

/// Polarity of a sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentKind {
    Positive,
    Neutral,
    Negative,
}

impl SentimentKind {
    /// Every classification, in a fixed order
    pub const ALL: [SentimentKind; 3] = [
        SentimentKind::Positive,
        SentimentKind::Neutral,
        SentimentKind::Negative,
    ];

    /// The kinds an opposite-sentiment search accepts when `self` is the
    /// reference classification
    pub fn opposites(self) -> Vec<SentimentKind> {
        Self::ALL.iter().copied().filter(|k| *k != self).collect()
    }
}

impl std::fmt::Display for SentimentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SentimentKind::Positive => "positive",
            SentimentKind::Neutral => "neutral",
            SentimentKind::Negative => "negative",
        };
        write!(f, "{}", name)
    }
}

/// A sentiment classification with the classifier's confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// Classified polarity
    pub kind: SentimentKind,
    /// Classifier confidence in [0.0, 1.0]
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites_exclude_reference_kind() {
        let opposites = SentimentKind::Negative.opposites();
        assert_eq!(opposites.len(), 2);
        assert!(!opposites.contains(&SentimentKind::Negative));
        assert!(opposites.contains(&SentimentKind::Positive));
        assert!(opposites.contains(&SentimentKind::Neutral));
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&SentimentKind::Positive).unwrap();
        assert_eq!(json, "\"positive\"");

        let parsed: SentimentKind = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(parsed, SentimentKind::Negative);
    }
}
