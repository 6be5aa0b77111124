//! Mathematical pathway.

use super::{Pathway, PathwayContext};
use crate::config::EvaluatorConfig;
use crate::expression::{format_number, Evaluator};
use crate::types::{Category, CategoryResult};

const SELF_PROMPTS: &[&str] = &[
    "What numbers and operations are involved?",
    "Which operations take precedence?",
    "Does the result hold up when I recompute it?",
];

const SOLVED_CONFIDENCE: f64 = 0.95;
const UNSOLVED_CONFIDENCE: f64 = 0.3;

/// Evaluates arithmetic in the utterance.
#[derive(Debug, Clone, Default)]
pub struct MathematicalPathway {
    evaluator: Evaluator,
}

impl MathematicalPathway {
    /// Create with custom evaluator configuration.
    pub fn with_config(config: &EvaluatorConfig) -> Self {
        Self {
            evaluator: Evaluator::with_config(config),
        }
    }
}

impl Pathway for MathematicalPathway {
    fn category(&self) -> Category {
        Category::Mathematical
    }

    fn self_prompts(&self) -> &[&'static str] {
        SELF_PROMPTS
    }

    fn process(&self, ctx: &PathwayContext<'_>) -> CategoryResult {
        match self.evaluator.evaluate(ctx.utterance) {
            Some(evaluation) => {
                let content = if evaluation.is_defined() {
                    format!("Computed {}", format_number(evaluation.answer))
                } else {
                    evaluation.steps.join("; ")
                };
                let mut result =
                    CategoryResult::new(Category::Mathematical, content, SOLVED_CONFIDENCE)
                        .with_answer(evaluation.answer, evaluation.steps)
                        .with_next_thought("Double-check the arithmetic against the question");
                result.warnings = evaluation.warnings;
                result
            }
            None => CategoryResult::new(
                Category::Mathematical,
                "No well-formed calculation found",
                UNSOLVED_CONFIDENCE,
            )
            .with_next_thought("Look for numbers and the operations joining them"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::PersonalFacts;

    fn run(utterance: &str) -> CategoryResult {
        let facts = PersonalFacts::new();
        let ctx = PathwayContext {
            utterance,
            self_prompt: SELF_PROMPTS[0],
            iteration: 1,
            facts: &facts,
        };
        MathematicalPathway::default().process(&ctx)
    }

    #[test]
    fn test_solved() {
        let result = run("what is 6 * 7?");
        assert_eq!(result.answer, Some(42.0));
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.steps, vec!["6 × 7 = 42"]);
    }

    #[test]
    fn test_unsolved() {
        let result = run("what is 6 * ?");
        assert!(result.answer.is_none());
        assert_eq!(result.confidence, 0.3);
    }

    #[test]
    fn test_divide_by_zero_still_resolves() {
        let result = run("10/0");
        assert!(result.answer.is_some_and(f64::is_nan));
        assert_eq!(result.content, "Cannot divide by zero");
    }
}
