//! Placeholder pathways for inquiry and conversation.
//!
//! These only narrate; the synthesizer supplies the actual answer from the
//! knowledge store or the fallback phrasing.

use super::{Pathway, PathwayContext};
use crate::types::{Category, CategoryResult};

const PLACEHOLDER_CONFIDENCE: f64 = 0.6;

const INQUIRY_PROMPTS: &[&str] = &[
    "What exactly is being asked?",
    "Which concepts does the question touch?",
    "What do I already know about them?",
    "Is there a simpler way to put the answer?",
    "Have I missed a related idea?",
];

const CONVERSATIONAL_PROMPTS: &[&str] = &[
    "What is the tone of this message?",
    "What would a natural reply acknowledge?",
    "Is there anything worth looking up?",
];

/// Fixed-confidence pathway driven by a prompt list.
#[derive(Debug, Clone)]
pub struct TemplatePathway {
    category: Category,
    prompts: &'static [&'static str],
}

impl TemplatePathway {
    /// Pathway for questions.
    pub fn inquiry() -> Self {
        Self {
            category: Category::Inquiry,
            prompts: INQUIRY_PROMPTS,
        }
    }

    /// Pathway for everything else.
    pub fn conversational() -> Self {
        Self {
            category: Category::Conversational,
            prompts: CONVERSATIONAL_PROMPTS,
        }
    }
}

impl Pathway for TemplatePathway {
    fn category(&self) -> Category {
        self.category
    }

    fn self_prompts(&self) -> &[&'static str] {
        self.prompts
    }

    fn process(&self, ctx: &PathwayContext<'_>) -> CategoryResult {
        CategoryResult::new(
            self.category,
            format!("Considered: {}", ctx.self_prompt),
            PLACEHOLDER_CONFIDENCE,
        )
        .with_next_thought(self.self_prompt(ctx.iteration + 1))
    }
}
