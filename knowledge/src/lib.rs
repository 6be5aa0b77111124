//! Knowledge Store for the cognitive resolution pipeline
//!
//! A read-only mapping of concept keys to short descriptions, loaded once at
//! startup and shared by every pipeline run without synchronization:
//!
//! - [`KnowledgeEntry`]: one concept with its keywords and base confidence
//! - [`KnowledgeSource`]: async bootstrap collaborator (built-in seed, JSON file, static list)
//! - [`KnowledgeStore`]: lexical relevance ranking over the loaded entries
//!
//! # Example
//!
//! ```ignore
//! use knowledge::{BuiltinSource, KnowledgeStore, tokenize::query_tokens};
//!
//! let store = KnowledgeStore::bootstrap(&BuiltinSource::new()).await?;
//! let hits = store.query(&query_tokens("what is photosynthesis?", 3));
//! ```

pub mod source;
pub mod store;
pub mod tokenize;
pub mod types;

// Re-export main types
pub use source::{BuiltinSource, JsonFileSource, KnowledgeSource, StaticSource};
pub use store::{KnowledgeHit, KnowledgeStore};
pub use types::*;
