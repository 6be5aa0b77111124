//! Bootstrap sources for the knowledge store.
//!
//! The store itself never performs I/O after startup; a source is consulted
//! once by [`crate::KnowledgeStore::bootstrap`].

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::types::{KnowledgeEntry, KnowledgeError, Result};

/// Seed data compiled into the crate.
const BUILTIN_SEED: &str = include_str!("seed/knowledge.json");

/// Trait for collaborators that supply knowledge entries at startup.
///
/// Entries are returned in the order the store should use for tie-breaking.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Source identifier for logs.
    fn name(&self) -> &str;

    /// Load all entries.
    async fn load(&self) -> Result<Vec<KnowledgeEntry>>;
}

/// Parse a JSON seed (an array of entries).
pub fn parse_seed(json: &str) -> Result<Vec<KnowledgeEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// The seed bundled with the crate.
#[derive(Debug, Clone, Default)]
pub struct BuiltinSource;

impl BuiltinSource {
    /// Create a new built-in source.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl KnowledgeSource for BuiltinSource {
    fn name(&self) -> &str {
        "builtin"
    }

    async fn load(&self) -> Result<Vec<KnowledgeEntry>> {
        parse_seed(BUILTIN_SEED)
    }
}

/// Seed read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    label: String,
}

impl JsonFileSource {
    /// Create a source for the given path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let label = path.display().to_string();
        Self { path, label }
    }
}

#[async_trait]
impl KnowledgeSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn load(&self) -> Result<Vec<KnowledgeEntry>> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(KnowledgeError::SourceUnavailable(format!(
                "seed file not found: {}",
                self.label
            )));
        }

        tracing::debug!(path = %self.label, "Reading knowledge seed");
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_seed(&content)
    }
}

/// In-memory list of entries, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    entries: Vec<KnowledgeEntry>,
}

impl StaticSource {
    /// Create a source from entries.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl KnowledgeSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn load(&self) -> Result<Vec<KnowledgeEntry>> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KnowledgeStore;

    #[tokio::test]
    async fn test_builtin_seed_loads() {
        let store = KnowledgeStore::bootstrap(&BuiltinSource::new())
            .await
            .unwrap();
        assert!(!store.is_empty());
        assert!(store.get("photosynthesis").is_some());
    }

    #[tokio::test]
    async fn test_static_source_preserves_order() {
        let source = StaticSource::new(vec![
            KnowledgeEntry::new("b", "B", "Second letter.", 0.5),
            KnowledgeEntry::new("a", "A", "First letter.", 0.5),
        ]);

        let store = KnowledgeStore::bootstrap(&source).await.unwrap();
        let keys: Vec<&str> = store.entries().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[tokio::test]
    async fn test_missing_file_unavailable() {
        let source = JsonFileSource::new("/nonexistent/knowledge.json");
        let result = source.load().await;
        assert!(matches!(result, Err(KnowledgeError::SourceUnavailable(_))));
    }

    #[test]
    fn test_parse_seed_rejects_garbage() {
        assert!(matches!(parse_seed("{not json"), Err(KnowledgeError::Parse(_))));
    }
}
