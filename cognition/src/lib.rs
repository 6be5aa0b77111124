//! Cognitive Resolution Pipeline
//!
//! Resolves one utterance at a time into an answer with a confidence and an
//! explanatory thought trace:
//!
//! - **Classify**: lexical features select a category and an initial spark
//! - **Reason**: a bounded loop runs the category's pathway, keeping the best pass
//! - **Synthesize**: the best pass becomes text, falling back to knowledge or phrasing
//! - **Verify**: numeric answers are re-derived and corrected at most once
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                     CognitivePipeline                         │
//! │                                                               │
//! │  ┌────────────┐  ┌────────────┐  ┌─────────────┐  ┌────────┐ │
//! │  │ Classifier │──│   Engine   │──│ Synthesizer │──│ Verify │ │
//! │  └────────────┘  └─────┬──────┘  └──────┬──────┘  └────────┘ │
//! │                        │                │                     │
//! │                ┌───────▼───────┐ ┌──────▼─────────┐           │
//! │                │   Pathways    │ │ KnowledgeStore │           │
//! │                └───────────────┘ └────────────────┘           │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cognition::{CognitivePipeline, PersonalFacts};
//! use knowledge::{BuiltinSource, KnowledgeStore};
//! use std::sync::Arc;
//!
//! let store = Arc::new(KnowledgeStore::bootstrap(&BuiltinSource::new()).await?);
//! let pipeline = CognitivePipeline::new(store);
//! let resolved = pipeline.resolve("2+3*4", PersonalFacts::new());
//! assert_eq!(resolved.answer, Some(14.0));
//! ```

pub mod classifier;
pub mod config;
pub mod engine;
pub mod expression;
pub mod facts;
pub mod pathway;
pub mod phrasing;
pub mod pipeline;
pub mod synthesizer;
pub mod trace;
pub mod types;
pub mod verification;

// Re-export main types
pub use classifier::InputClassifier;
pub use config::{CognitionConfig, MAX_ITERATIONS};
pub use engine::IterativeReasoningEngine;
pub use facts::{FactSuggestion, MemorySink, PersonalFacts, SuggestionSink};
pub use pipeline::{CognitivePipeline, CognitivePipelineBuilder};
pub use synthesizer::ResolutionSynthesizer;
pub use trace::{ThoughtEvent, ThoughtKind, ThoughtTrace};
pub use types::*;
pub use verification::Verifier;
