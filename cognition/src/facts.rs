//! Personal facts snapshot and extraction suggestions.
//!
//! The pipeline only ever reads a [`PersonalFacts`] snapshot. Anything it
//! learns is returned as [`FactSuggestion`]s; persisting them is the
//! caller's job, optionally through a [`SuggestionSink`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::types::Result;

/// Read-only key/value snapshot of what is known about the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonalFacts {
    facts: BTreeMap<String, String>,
}

impl PersonalFacts {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with one more fact.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.facts.insert(key.into(), value.into());
        self
    }

    /// Look up a fact.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.facts.get(key).map(String::as_str)
    }

    /// Whether a fact is present.
    pub fn contains(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    /// All facts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.facts.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// A new snapshot with suggestions applied on top of this one.
    ///
    /// Intended for the caller's persistence layer; the pipeline never calls it.
    pub fn apply(&self, suggestions: &[FactSuggestion]) -> Self {
        let mut facts = self.facts.clone();
        for suggestion in suggestions {
            facts.insert(suggestion.key.clone(), suggestion.value.clone());
        }
        Self { facts }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PersonalFacts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            facts: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A fact discovered during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct FactSuggestion {
    /// Fact key (`name`, `relation.<word>`, `possession.<word>`, `household_size`)
    pub key: String,
    /// Fact value
    pub value: String,
    /// Extraction confidence (0.0 - 1.0)
    pub confidence: f64,
}

impl FactSuggestion {
    /// Create a new suggestion.
    pub fn new(key: impl Into<String>, value: impl Into<String>, confidence: f64) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            confidence,
        }
    }
}

/// Trait for the caller's persistence boundary.
#[async_trait]
pub trait SuggestionSink: Send + Sync {
    /// Receive the suggestions produced by one run.
    async fn accept(&self, suggestions: &[FactSuggestion]) -> Result<()>;
}

/// In-memory sink that keeps every suggestion it receives.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    received: Arc<RwLock<Vec<FactSuggestion>>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far.
    pub async fn received(&self) -> Vec<FactSuggestion> {
        self.received.read().await.clone()
    }

    /// Received suggestions folded into a snapshot.
    pub async fn snapshot(&self) -> PersonalFacts {
        PersonalFacts::new().apply(&self.received.read().await)
    }
}

#[async_trait]
impl SuggestionSink for MemorySink {
    async fn accept(&self, suggestions: &[FactSuggestion]) -> Result<()> {
        let mut received = self.received.write().await;
        received.extend_from_slice(suggestions);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_returns_new_snapshot() {
        let facts = PersonalFacts::new().with("name", "Ada");
        let updated = facts.apply(&[
            FactSuggestion::new("name", "Grace", 0.9),
            FactSuggestion::new("household_size", "3", 0.95),
        ]);

        assert_eq!(facts.get("name"), Some("Ada"));
        assert_eq!(updated.get("name"), Some("Grace"));
        assert_eq!(updated.get("household_size"), Some("3"));
    }

    #[test]
    fn test_from_iter() {
        let facts: PersonalFacts = [("a", "1"), ("b", "2")].into_iter().collect();
        let keys: Vec<&str> = facts.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_memory_sink() {
        let sink = MemorySink::new();
        sink.accept(&[FactSuggestion::new("name", "Ron", 0.9)])
            .await
            .unwrap();

        assert_eq!(sink.received().await.len(), 1);
        assert_eq!(sink.snapshot().await.get("name"), Some("Ron"));
    }
}
