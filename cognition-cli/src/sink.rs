//! File-backed personal facts.

use async_trait::async_trait;
use cognition::{CognitionError, FactSuggestion, PersonalFacts, SuggestionSink};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a facts snapshot, treating a missing file as empty.
pub async fn load_facts(path: &Path) -> cognition::Result<PersonalFacts> {
    if !tokio::fs::try_exists(path)
        .await
        .map_err(|e| CognitionError::Sink(e.to_string()))?
    {
        return Ok(PersonalFacts::new());
    }
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CognitionError::Sink(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| CognitionError::Sink(e.to_string()))
}

/// Persists suggestions into a JSON object of facts.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Create a sink writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl SuggestionSink for JsonFileSink {
    async fn accept(&self, suggestions: &[FactSuggestion]) -> cognition::Result<()> {
        let facts = load_facts(&self.path).await?.apply(suggestions);
        let json =
            serde_json::to_string_pretty(&facts).map_err(|e| CognitionError::Sink(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| CognitionError::Sink(e.to_string()))?;

        debug!(path = %self.path.display(), facts = facts.len(), "Persisted facts");
        Ok(())
    }
}
