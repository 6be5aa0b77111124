//! The read-only knowledge store and its lexical ranking.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use tracing::{debug, info};

use crate::source::KnowledgeSource;
use crate::types::{KnowledgeEntry, KnowledgeError, Result};

/// An entry with its precomputed match text.
#[derive(Debug, Clone)]
struct IndexedEntry {
    entry: KnowledgeEntry,
    haystack: String,
}

/// A ranked query hit.
#[derive(Debug, Clone, Copy)]
pub struct KnowledgeHit<'a> {
    /// Matching entry
    pub entry: &'a KnowledgeEntry,
    /// Fraction of query tokens found in the entry (0.0 - 1.0)
    pub score: f64,
    /// Number of query tokens found
    pub matched: usize,
}

/// Read-only knowledge store.
///
/// Built once during startup and shared (usually behind an `Arc`) by every
/// pipeline run. Nothing in the store is mutable after construction.
#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    entries: Vec<IndexedEntry>,
    fingerprint: String,
}

impl KnowledgeStore {
    /// Load and validate entries from a source.
    pub async fn bootstrap(source: &dyn KnowledgeSource) -> Result<Self> {
        info!(source = %source.name(), "Bootstrapping knowledge store");

        let entries = source.load().await?;
        let store = Self::from_entries(entries)?;

        info!(
            entries = store.len(),
            fingerprint = %store.fingerprint(),
            "Knowledge store ready"
        );
        Ok(store)
    }

    /// Build a store from already-loaded entries.
    ///
    /// Keys must be unique and non-empty, base confidences must lie in
    /// `[0, 1]`. Duplicate keywords inside an entry are dropped, keeping the
    /// first occurrence.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut indexed = Vec::with_capacity(entries.len());

        for mut entry in entries {
            validate(&entry)?;
            if !seen.insert(entry.key.clone()) {
                return Err(KnowledgeError::DuplicateKey(entry.key));
            }

            let mut keywords = HashSet::new();
            entry.keywords.retain(|k| keywords.insert(k.to_lowercase()));

            let haystack = entry.haystack();
            indexed.push(IndexedEntry { entry, haystack });
        }

        let fingerprint = compute_fingerprint(&indexed);
        Ok(Self {
            entries: indexed,
            fingerprint,
        })
    }

    /// An empty store.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            fingerprint: compute_fingerprint(&[]),
        }
    }

    /// Rank entries against lower-case query tokens.
    ///
    /// Score is the number of tokens appearing as a substring of the entry's
    /// concept, description and keywords, divided by the token count. Only
    /// entries scoring above zero are returned, best first; ties keep
    /// insertion order.
    pub fn query(&self, tokens: &[String]) -> Vec<KnowledgeHit<'_>> {
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<KnowledgeHit<'_>> = self
            .entries
            .iter()
            .filter_map(|indexed| {
                let matched = tokens
                    .iter()
                    .filter(|t| indexed.haystack.contains(t.as_str()))
                    .count();
                (matched > 0).then(|| KnowledgeHit {
                    entry: &indexed.entry,
                    score: matched as f64 / tokens.len() as f64,
                    matched,
                })
            })
            .collect();

        // sort_by is stable, so equal scores stay in insertion order
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));

        debug!(tokens = tokens.len(), hits = hits.len(), "Knowledge query");
        hits
    }

    /// Look up an entry by key.
    pub fn get(&self, key: &str) -> Option<&KnowledgeEntry> {
        self.entries
            .iter()
            .find(|e| e.entry.key == key)
            .map(|e| &e.entry)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &KnowledgeEntry> {
        self.entries.iter().map(|e| &e.entry)
    }

    /// SHA-256 over the canonical JSON of all entries.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::empty()
    }
}

fn validate(entry: &KnowledgeEntry) -> Result<()> {
    if entry.key.trim().is_empty() {
        return Err(KnowledgeError::InvalidEntry {
            key: entry.key.clone(),
            reason: "key is empty".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&entry.base_confidence) {
        return Err(KnowledgeError::InvalidEntry {
            key: entry.key.clone(),
            reason: format!("base confidence {} outside [0, 1]", entry.base_confidence),
        });
    }
    Ok(())
}

fn compute_fingerprint(entries: &[IndexedEntry]) -> String {
    let canonical: Vec<&KnowledgeEntry> = entries.iter().map(|e| &e.entry).collect();
    let json = serde_json::to_string(&canonical).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    hex::encode(hasher.finalize())
}
