//! Iterative reasoning engine.
//!
//! Runs the spark's pathway for at most [`MAX_ITERATIONS`] passes, keeping
//! the most confident result. Each pass reads the original utterance; the
//! pathway's next thought is narrated but never fed back as input.

use tracing::debug;

use crate::config::{CognitionConfig, EngineConfig, MAX_ITERATIONS};
use crate::facts::PersonalFacts;
use crate::pathway::{PathwayContext, PathwaySet};
use crate::trace::{ThoughtKind, ThoughtTrace};
use crate::types::{InputSpark, IterationRecord, IterationResult};

/// Bounded reasoning loop over category pathways.
pub struct IterativeReasoningEngine {
    pathways: PathwaySet,
    config: EngineConfig,
}

impl IterativeReasoningEngine {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CognitionConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: &CognitionConfig) -> Self {
        Self {
            pathways: PathwaySet::with_config(config),
            config: config.engine.clone(),
        }
    }

    /// Run the loop for one utterance.
    pub fn run(
        &self,
        utterance: &str,
        spark: &InputSpark,
        facts: &PersonalFacts,
        trace: &mut ThoughtTrace,
    ) -> IterationResult {
        let pathway = self.pathways.get(spark.category);
        let mut records: Vec<IterationRecord> = Vec::with_capacity(MAX_ITERATIONS);
        let mut best_index = 0;
        let mut best_confidence = f64::NEG_INFINITY;

        for iteration in 1..=MAX_ITERATIONS {
            let self_prompt = pathway.self_prompt(iteration);
            let ctx = PathwayContext {
                utterance,
                self_prompt,
                iteration,
                facts,
            };
            let result = pathway.process(&ctx);
            let confidence = result.confidence;

            trace.emit(
                ThoughtKind::Iteration,
                format!("Pass {}: {} {}", iteration, self_prompt, result.content),
                confidence,
            );
            debug!(
                iteration,
                category = %spark.category,
                confidence,
                "Reasoning pass complete"
            );

            if confidence > best_confidence {
                best_confidence = confidence;
                best_index = records.len();
                trace.emit(
                    ThoughtKind::NewBest,
                    format!("New best at pass {} ({:.2})", iteration, confidence),
                    confidence,
                );
            }

            let next_thought = result.next_thought.clone();
            records.push(IterationRecord {
                index: iteration,
                self_prompt: self_prompt.to_string(),
                result,
                confidence,
                best_so_far: best_confidence,
            });

            if confidence > self.config.early_exit_threshold {
                trace.emit(
                    ThoughtKind::Converged,
                    format!("Confident enough after {} pass(es)", iteration),
                    confidence,
                );
                break;
            }
            if let Some(thought) = next_thought {
                trace.emit(ThoughtKind::Iteration, thought, confidence);
            }
        }

        IterationResult {
            records,
            best_index,
            pathways: vec![spark.category],
        }
    }
}

impl Default for IterativeReasoningEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::InputClassifier;
    use crate::types::Category;

    fn run(utterance: &str) -> (IterationResult, ThoughtTrace) {
        let spark = InputClassifier::new().classify(utterance);
        let mut trace = ThoughtTrace::new();
        let result =
            IterativeReasoningEngine::new().run(utterance, &spark, &PersonalFacts::new(), &mut trace);
        (result, trace)
    }

    #[test]
    fn test_confident_math_exits_after_one_pass() {
        let (result, trace) = run("2+3*4");
        assert_eq!(result.passes(), 1);
        assert_eq!(result.best().result.answer, Some(14.0));
        assert_eq!(trace.count(ThoughtKind::Converged), 1);
        assert_eq!(result.pathways, vec![Category::Mathematical]);
    }

    #[test]
    fn test_never_exceeds_cap() {
        for text in ["Tell me a joke", "What is photosynthesis?", "call me Ada", "7 * ?"] {
            let (result, _) = run(text);
            assert!(result.passes() <= MAX_ITERATIONS);
        }
        assert_eq!(run("Tell me a joke").0.passes(), MAX_ITERATIONS);
    }

    #[test]
    fn test_best_so_far_is_monotonic() {
        let (result, _) = run("What is photosynthesis?");
        let best: Vec<f64> = result.records.iter().map(|r| r.best_so_far).collect();
        assert!(best.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(result.best_index, 0);
    }

    #[test]
    fn test_new_best_only_on_strict_improvement() {
        let (_, trace) = run("Tell me a joke");
        assert_eq!(trace.count(ThoughtKind::NewBest), 1);
        assert_eq!(trace.count(ThoughtKind::Converged), 0);
    }

    #[test]
    fn test_threshold_is_configurable() {
        let mut config = CognitionConfig::default();
        config.engine.early_exit_threshold = 0.5;
        let engine = IterativeReasoningEngine::with_config(&config);

        let text = "Tell me a joke";
        let spark = InputClassifier::new().classify(text);
        let mut trace = ThoughtTrace::new();
        let result = engine.run(text, &spark, &PersonalFacts::new(), &mut trace);
        assert_eq!(result.passes(), 1);
    }
}
