//! Category pathways - one processing strategy per [`Category`].
//!
//! - **mathematical**: delegates to the expression evaluator
//! - **personal**: extracts structured facts and derived counts
//! - **inquiry** / **conversational**: placeholder results; knowledge is
//!   attached later by the synthesizer

mod mathematical;
mod personal;
mod template;

pub use mathematical::MathematicalPathway;
pub use personal::PersonalPathway;
pub use template::TemplatePathway;

use crate::config::CognitionConfig;
use crate::facts::PersonalFacts;
use crate::types::{Category, CategoryResult};

/// Input to one pathway invocation.
#[derive(Debug, Clone, Copy)]
pub struct PathwayContext<'a> {
    /// Original utterance
    pub utterance: &'a str,
    /// Clarifying question for this pass
    pub self_prompt: &'a str,
    /// Pass number, starting at 1
    pub iteration: usize,
    /// Read-only facts snapshot
    pub facts: &'a PersonalFacts,
}

/// A category-specific processing strategy.
pub trait Pathway: Send + Sync {
    /// Category this pathway handles.
    fn category(&self) -> Category;

    /// Ordered clarifying questions; the last repeats once exhausted.
    fn self_prompts(&self) -> &[&'static str];

    /// Process the utterance for one pass.
    fn process(&self, ctx: &PathwayContext<'_>) -> CategoryResult;

    /// Self-prompt for a 1-based pass number.
    fn self_prompt(&self, iteration: usize) -> &'static str {
        let prompts = self.self_prompts();
        if prompts.is_empty() {
            return "";
        }
        prompts[iteration.saturating_sub(1).min(prompts.len() - 1)]
    }
}

/// The full set of pathways, one per category.
pub struct PathwaySet {
    mathematical: MathematicalPathway,
    personal: PersonalPathway,
    inquiry: TemplatePathway,
    conversational: TemplatePathway,
}

impl PathwaySet {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CognitionConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: &CognitionConfig) -> Self {
        Self {
            mathematical: MathematicalPathway::with_config(&config.evaluator),
            personal: PersonalPathway::new(),
            inquiry: TemplatePathway::inquiry(),
            conversational: TemplatePathway::conversational(),
        }
    }

    /// Pathway for a category.
    pub fn get(&self, category: Category) -> &dyn Pathway {
        match category {
            Category::Mathematical => &self.mathematical,
            Category::Personal => &self.personal,
            Category::Inquiry => &self.inquiry,
            Category::Conversational => &self.conversational,
        }
    }
}

impl Default for PathwaySet {
    fn default() -> Self {
        Self::new()
    }
}
