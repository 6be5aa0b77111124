//! Resolution synthesizer - turns the best reasoning pass into answer text.
//!
//! Total over its inputs: every run resolves to something, falling back to a
//! conversational acknowledgment when neither the pathway nor the knowledge
//! store produced an answer.

use knowledge::tokenize::query_tokens;
use knowledge::KnowledgeStore;
use rand::Rng;
use tracing::debug;

use crate::config::{CognitionConfig, KnowledgeConfig};
use crate::expression::format_number;
use crate::facts::PersonalFacts;
use crate::phrasing::{self, ACKNOWLEDGMENTS, FALLBACK_RESPONSES};
use crate::trace::{ThoughtKind, ThoughtTrace};
use crate::types::{Category, CategoryResult, IterationResult, Resolution};

/// Confidence of the conversational fallback.
pub const FALLBACK_CONFIDENCE: f64 = 0.6;

/// Render a numeric answer with its derivation.
pub fn render_math(answer: f64, steps: &[String]) -> String {
    let mut text = if answer.is_nan() {
        "the answer is undefined".to_string()
    } else {
        format!("the answer is {}", format_number(answer))
    };
    if !steps.is_empty() {
        text.push_str(". Here's how I solved it: ");
        text.push_str(&steps.join(" → "));
    }
    text
}

/// Builds the final [`Resolution`] of a run.
#[derive(Debug, Clone)]
pub struct ResolutionSynthesizer {
    config: KnowledgeConfig,
}

impl ResolutionSynthesizer {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CognitionConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: &CognitionConfig) -> Self {
        Self {
            config: config.knowledge.clone(),
        }
    }

    /// Synthesize the answer from the best pass.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        utterance: &str,
        iterations: &IterationResult,
        store: &KnowledgeStore,
        facts: &PersonalFacts,
        trace: &mut ThoughtTrace,
        rng: &mut R,
    ) -> Resolution {
        let best = &iterations.best().result;

        let resolution = match (best.category, best.answer) {
            (Category::Mathematical, Some(answer)) => Resolution {
                category: best.category,
                content: render_math(answer, &best.steps),
                confidence: best.confidence,
                answer: Some(answer),
                steps: best.steps.clone(),
            },
            (Category::Personal, _) => self.personal(best, facts, rng),
            _ => self.from_knowledge(utterance, best.category, store, trace, rng),
        };

        debug!(
            category = %resolution.category,
            confidence = resolution.confidence,
            "Synthesized resolution"
        );
        trace.emit(
            ThoughtKind::Synthesis,
            format!("Answering: {}", resolution.content),
            resolution.confidence,
        );
        resolution
    }

    fn personal<R: Rng + ?Sized>(
        &self,
        best: &CategoryResult,
        facts: &PersonalFacts,
        rng: &mut R,
    ) -> Resolution {
        let name = best
            .details
            .as_ref()
            .and_then(|d| d.name.clone().or_else(|| d.remembered_name.clone()))
            .or_else(|| facts.get("name").map(str::to_string));

        let body = match best.answer {
            Some(size) if size == 1.0 => "It's just you in your household.".to_string(),
            Some(size) => format!(
                "Including you, your household has {} people.",
                format_number(size)
            ),
            None => phrasing::pick(ACKNOWLEDGMENTS, rng).to_string(),
        };

        let content = match name {
            Some(name) => format!("{} {}", phrasing::greeting(&name, rng), body),
            None => body,
        };

        Resolution {
            category: Category::Personal,
            content,
            confidence: best.confidence,
            answer: best.answer,
            steps: best.steps.clone(),
        }
    }

    fn from_knowledge<R: Rng + ?Sized>(
        &self,
        utterance: &str,
        category: Category,
        store: &KnowledgeStore,
        trace: &mut ThoughtTrace,
        rng: &mut R,
    ) -> Resolution {
        let tokens = query_tokens(utterance, self.config.min_token_len);
        let hits = store.query(&tokens);

        match hits.first() {
            Some(hit) => {
                trace.emit(
                    ThoughtKind::Knowledge,
                    format!(
                        "Recalled '{}' ({} of {} terms matched)",
                        hit.entry.concept,
                        hit.matched,
                        tokens.len()
                    ),
                    hit.entry.base_confidence,
                );
                Resolution {
                    category,
                    content: hit.entry.description.clone(),
                    confidence: hit.entry.base_confidence,
                    answer: None,
                    steps: Vec::new(),
                }
            }
            None => {
                trace.emit(
                    ThoughtKind::Knowledge,
                    "Nothing in the knowledge store matched",
                    FALLBACK_CONFIDENCE,
                );
                Resolution {
                    category,
                    content: phrasing::pick(FALLBACK_RESPONSES, rng).to_string(),
                    confidence: FALLBACK_CONFIDENCE,
                    answer: None,
                    steps: Vec::new(),
                }
            }
        }
    }
}

impl Default for ResolutionSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::InputClassifier;
    use crate::engine::IterativeReasoningEngine;
    use knowledge::KnowledgeEntry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn store() -> KnowledgeStore {
        KnowledgeStore::from_entries(vec![KnowledgeEntry::new(
            "photosynthesis",
            "Photosynthesis",
            "Plants turn light into chemical energy.",
            0.85,
        )
        .with_keywords(["plants", "chlorophyll"])])
        .unwrap()
    }

    fn synthesize(utterance: &str, facts: &PersonalFacts) -> (Resolution, ThoughtTrace) {
        let spark = InputClassifier::new().classify(utterance);
        let mut trace = ThoughtTrace::new();
        let iterations = IterativeReasoningEngine::new().run(utterance, &spark, facts, &mut trace);
        let resolution = ResolutionSynthesizer::new().synthesize(
            utterance,
            &iterations,
            &store(),
            facts,
            &mut trace,
            &mut StdRng::seed_from_u64(3),
        );
        (resolution, trace)
    }

    #[test]
    fn test_render_math() {
        let steps = vec!["3 × 4 = 12".to_string(), "2 + 12 = 14".to_string()];
        assert_eq!(
            render_math(14.0, &steps),
            "the answer is 14. Here's how I solved it: 3 × 4 = 12 → 2 + 12 = 14"
        );
        assert_eq!(render_math(42.0, &[]), "the answer is 42");
        assert!(render_math(f64::NAN, &["Cannot divide by zero".to_string()])
            .starts_with("the answer is undefined"));
    }

    #[test]
    fn test_math_passes_confidence_through() {
        let (resolution, trace) = synthesize("2+3*4", &PersonalFacts::new());
        assert_eq!(resolution.answer, Some(14.0));
        assert_eq!(resolution.confidence, 0.95);
        assert_eq!(trace.count(ThoughtKind::Synthesis), 1);
    }

    #[test]
    fn test_inquiry_uses_knowledge() {
        let (resolution, trace) = synthesize("What is photosynthesis?", &PersonalFacts::new());
        assert_eq!(resolution.content, "Plants turn light into chemical energy.");
        assert_eq!(resolution.confidence, 0.85);
        assert_eq!(trace.count(ThoughtKind::Knowledge), 1);
    }

    #[test]
    fn test_fallback() {
        let (resolution, _) = synthesize("Tell me a joke", &PersonalFacts::new());
        assert_eq!(resolution.confidence, FALLBACK_CONFIDENCE);
        assert!(FALLBACK_RESPONSES.contains(&resolution.content.as_str()));
        assert_eq!(resolution.category, Category::Conversational);
    }

    #[test]
    fn test_malformed_math_falls_through() {
        let (resolution, _) = synthesize("what is 6 * ?", &PersonalFacts::new());
        assert!(resolution.answer.is_none());
        assert_eq!(resolution.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_personal_household() {
        let (resolution, _) = synthesize(
            "My name is Ron and I have 1 wife and 2 cats",
            &PersonalFacts::new(),
        );
        assert_eq!(resolution.answer, Some(2.0));
        assert!(resolution.content.contains("Ron"));
        assert!(resolution.content.contains("2 people"));
    }

    #[test]
    fn test_personal_greets_remembered_name() {
        let facts = PersonalFacts::new().with("name", "Ada");
        let (resolution, _) = synthesize("I have 3 cars", &facts);
        assert!(resolution.content.contains("Ada"));
        assert_eq!(resolution.confidence, 0.7);
    }
}
