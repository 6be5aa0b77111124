//! Core types for the resolution pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "typescript")]
use ts_rs::TS;

use crate::expression::ParseWarning;
use crate::facts::FactSuggestion;
use crate::trace::ThoughtEvent;

/// Category an utterance is classified into.
///
/// Each category selects one pathway in the reasoning engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Arithmetic to evaluate
    Mathematical,
    /// Facts the user shares about themselves
    Personal,
    /// A question to answer from knowledge
    Inquiry,
    /// Anything else
    Conversational,
}

impl Category {
    /// All categories in classification priority order.
    pub const ALL: [Category; 4] = [
        Self::Mathematical,
        Self::Personal,
        Self::Inquiry,
        Self::Conversational,
    ];

    /// Get the tag string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mathematical => "mathematical",
            Self::Personal => "personal",
            Self::Inquiry => "inquiry",
            Self::Conversational => "conversational",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lexical features of an utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct InputFeatures {
    /// Contains at least one digit
    pub has_numbers: bool,
    /// Contains an arithmetic operator character
    pub has_operators: bool,
    /// Ends in or contains `?`, or starts with an interrogative
    pub has_question_markers: bool,
    /// Contains a first-person identity or possession marker
    pub has_personal_markers: bool,
    /// Whitespace-separated word count
    pub word_count: usize,
    /// Rough complexity (0.0 - 1.0)
    pub complexity_score: f64,
}

/// The initial classification of an utterance.
///
/// Created once per run and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct InputSpark {
    /// Selected category
    pub category: Category,
    /// Classification confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Feature summary
    pub features: InputFeatures,
}

/// Personal details extracted by the personal pathway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalDetails {
    /// Name stated in this utterance
    pub name: Option<String>,
    /// Name remembered from the facts snapshot
    pub remembered_name: Option<String>,
    /// Person-denoting relations with quantities, in mention order
    pub relations: Vec<(String, u32)>,
    /// Non-person possessions with quantities, in mention order
    pub possessions: Vec<(String, u32)>,
}

/// Output of one pathway invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryResult {
    /// Pathway that produced this result
    pub category: Category,
    /// Pathway-level summary text
    pub content: String,
    /// Pathway confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Numeric answer, if one was computed
    pub answer: Option<f64>,
    /// Ordered derivation steps
    pub steps: Vec<String>,
    /// Advisory thought for the next pass
    pub next_thought: Option<String>,
    /// Facts the caller may want to persist
    pub suggestions: Vec<FactSuggestion>,
    /// Personal details, for the personal pathway
    pub details: Option<PersonalDetails>,
    /// Parse warnings from expression evaluation
    pub warnings: Vec<ParseWarning>,
}

impl CategoryResult {
    /// Create a result with content and confidence.
    pub fn new(category: Category, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            category,
            content: content.into(),
            confidence: clamp01(confidence),
            answer: None,
            steps: Vec::new(),
            next_thought: None,
            suggestions: Vec::new(),
            details: None,
            warnings: Vec::new(),
        }
    }

    /// Set the numeric answer and its steps.
    pub fn with_answer(mut self, answer: f64, steps: Vec<String>) -> Self {
        self.answer = Some(answer);
        self.steps = steps;
        self
    }

    /// Set the next thought.
    pub fn with_next_thought(mut self, thought: impl Into<String>) -> Self {
        self.next_thought = Some(thought.into());
        self
    }
}

/// One pass of the reasoning loop.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationRecord {
    /// Pass number, starting at 1
    pub index: usize,
    /// Clarifying question asked this pass
    pub self_prompt: String,
    /// Pathway output
    pub result: CategoryResult,
    /// Confidence of this pass
    pub confidence: f64,
    /// Best confidence seen up to and including this pass
    pub best_so_far: f64,
}

/// Output of the reasoning engine.
#[derive(Debug, Clone)]
pub struct IterationResult {
    /// All passes in order (never empty)
    pub records: Vec<IterationRecord>,
    /// Index into `records` of the best pass
    pub best_index: usize,
    /// Pathways dispatched, in first-use order
    pub pathways: Vec<Category>,
}

impl IterationResult {
    /// The best-confidence pass.
    pub fn best(&self) -> &IterationRecord {
        &self.records[self.best_index]
    }

    /// Number of passes executed.
    pub fn passes(&self) -> usize {
        self.records.len()
    }
}

/// The synthesized answer of a run, before and after verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Category of the best pass
    pub category: Category,
    /// Final text
    pub content: String,
    /// Final confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Numeric answer, if any
    pub answer: Option<f64>,
    /// Derivation steps
    pub steps: Vec<String>,
}

/// Everything a caller gets back from `resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Resolved {
    /// Category of the resolution
    pub category: Category,
    /// Answer text
    pub content: String,
    /// Confidence (0.0 - 1.0)
    pub confidence: f64,
    /// Numeric answer, if any
    pub answer: Option<f64>,
    /// Derivation steps
    pub steps: Vec<String>,
    /// Trace contents in emission order
    pub reasoning: Vec<String>,
    /// Pathways used, in order
    pub pathways: Vec<Category>,
    /// Extracted facts for the caller to persist
    pub suggestions: Vec<FactSuggestion>,
    /// Full thought trace
    pub trace: Vec<ThoughtEvent>,
    /// Initial classification
    pub spark: InputSpark,
    /// Reasoning passes executed
    pub iterations: usize,
    /// Whether verification replaced the answer
    pub corrected: bool,
    /// Parse warnings raised while evaluating arithmetic
    pub warnings: Vec<ParseWarning>,
    /// Fingerprint of the knowledge store used
    pub knowledge_fingerprint: String,
}

/// Error types for the pipeline boundary.
///
/// A run itself never fails; these cover configuration, bootstrap and
/// suggestion delivery.
#[derive(Debug, thiserror::Error)]
pub enum CognitionError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Knowledge bootstrap error
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] knowledge::KnowledgeError),

    /// Suggestion sink error
    #[error("Suggestion sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, CognitionError>;

/// Clamp a confidence into `[0, 1]`, mapping NaN to 0.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags() {
        assert_eq!(Category::Mathematical.as_str(), "mathematical");
        assert_eq!(
            serde_json::to_string(&Category::Conversational).unwrap(),
            "\"conversational\""
        );
        assert_eq!(Category::Inquiry.to_string(), "inquiry");
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(1.4), 1.0);
        assert_eq!(clamp01(-0.2), 0.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(0.42), 0.42);
    }

    #[test]
    fn test_category_result_clamps_confidence() {
        let result = CategoryResult::new(Category::Inquiry, "x", 3.0);
        assert_eq!(result.confidence, 1.0);
    }
}
