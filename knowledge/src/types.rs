//! Core types for the knowledge store.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A single concept known to the store.
///
/// Entries are loaded once from a [`crate::KnowledgeSource`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeEntry {
    /// Unique concept key
    pub key: String,
    /// Human-readable concept name
    pub concept: String,
    /// Description used as the answer text
    pub description: String,
    /// Keyword tokens (deduplicated on load)
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Confidence carried into a resolution drawn from this entry (0.0 - 1.0)
    pub base_confidence: f64,
}

impl KnowledgeEntry {
    /// Create a new entry.
    pub fn new(
        key: impl Into<String>,
        concept: impl Into<String>,
        description: impl Into<String>,
        base_confidence: f64,
    ) -> Self {
        Self {
            key: key.into(),
            concept: concept.into(),
            description: description.into(),
            keywords: Vec::new(),
            base_confidence,
        }
    }

    /// Add keywords.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    /// Lower-cased concatenation of concept, description and keywords.
    ///
    /// Query tokens are matched as substrings of this text.
    pub fn haystack(&self) -> String {
        let mut text = String::with_capacity(
            self.concept.len() + self.description.len() + self.keywords.len() * 8,
        );
        text.push_str(&self.concept);
        text.push(' ');
        text.push_str(&self.description);
        for keyword in &self.keywords {
            text.push(' ');
            text.push_str(keyword);
        }
        text.to_lowercase()
    }
}

/// Error types for knowledge loading.
#[derive(Debug, thiserror::Error)]
pub enum KnowledgeError {
    /// Seed could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Seed could not be parsed
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry failed validation
    #[error("Invalid entry '{key}': {reason}")]
    InvalidEntry { key: String, reason: String },

    /// Two entries share a key
    #[error("Duplicate knowledge key: {0}")]
    DuplicateKey(String),

    /// Source could not provide entries
    #[error("Knowledge source unavailable: {0}")]
    SourceUnavailable(String),
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haystack_joins_fields() {
        let entry = KnowledgeEntry::new("gravity", "Gravity", "Mass Attracts mass.", 0.8)
            .with_keywords(["Newton", "weight"]);

        assert_eq!(entry.haystack(), "gravity mass attracts mass. newton weight");
    }

    #[test]
    fn test_seed_format_is_camel_case() {
        let json = r#"{
            "key": "tide",
            "concept": "Tide",
            "description": "The rise and fall of sea levels.",
            "keywords": ["moon"],
            "baseConfidence": 0.75
        }"#;

        let entry: KnowledgeEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.key, "tide");
        assert_eq!(entry.keywords, vec!["moon".to_string()]);
        assert!((entry.base_confidence - 0.75).abs() < f64::EPSILON);
    }
}
