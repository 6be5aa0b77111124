//! Verification and self-correction for numeric answers.
//!
//! The expected value is re-derived from the original utterance
//! independently of the evaluator: a single operator is applied directly,
//! longer chains go through a shunting-yard pass. A mismatch triggers at
//! most one re-evaluation, whose result is final.

use tracing::{debug, warn};

use crate::config::{CognitionConfig, VerificationConfig};
use crate::expression::{format_number, Evaluator, Operator};
use crate::synthesizer::render_math;
use crate::trace::{ThoughtKind, ThoughtTrace};
use crate::types::{Category, Resolution};

/// Checks mathematical resolutions against an independent re-derivation.
#[derive(Debug, Clone)]
pub struct Verifier {
    config: VerificationConfig,
    evaluator: Evaluator,
}

impl Verifier {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(&CognitionConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: &CognitionConfig) -> Self {
        Self {
            config: config.verification.clone(),
            evaluator: Evaluator::with_config(&config.evaluator),
        }
    }

    /// Expected value of the arithmetic in `utterance`, if it can be re-derived.
    pub fn expected(&self, utterance: &str) -> Option<f64> {
        let lexed = self.evaluator.lex(utterance);
        let numbers = lexed.numbers();
        let operators = lexed.operators();

        match (numbers.len(), operators.len()) {
            (2, 1) => operators[0].apply(numbers[0], numbers[1]),
            (n, m) if self.config.verify_nary && n > 2 && m + 1 == n => {
                shunting_yard(&numbers, &operators)
            }
            _ => None,
        }
    }

    /// Verify a resolution, correcting it at most once.
    ///
    /// Returns the (possibly corrected) resolution and whether it changed.
    pub fn verify(
        &self,
        utterance: &str,
        resolution: Resolution,
        trace: &mut ThoughtTrace,
    ) -> (Resolution, bool) {
        if !self.config.enabled || resolution.category != Category::Mathematical {
            return (resolution, false);
        }
        let Some(answer) = resolution.answer.filter(|a| a.is_finite()) else {
            return (resolution, false);
        };
        let Some(expected) = self.expected(utterance) else {
            debug!("No independent derivation available");
            return (resolution, false);
        };

        let difference = (answer - expected).abs();
        if difference < self.config.tolerance {
            trace.emit(
                ThoughtKind::Verification,
                format!("Verified {} by recomputing it", format_number(answer)),
                resolution.confidence,
            );
            return (resolution, false);
        }

        warn!(
            answer,
            expected, difference, "Verification mismatch, re-evaluating once"
        );
        trace.emit(
            ThoughtKind::Verification,
            format!(
                "Expected {} but answered {}",
                format_number(expected),
                format_number(answer)
            ),
            resolution.confidence,
        );

        let Some(evaluation) = self.evaluator.evaluate(utterance) else {
            return (resolution, false);
        };
        let corrected = Resolution {
            content: render_math(evaluation.answer, &evaluation.steps),
            answer: Some(evaluation.answer),
            steps: evaluation.steps,
            ..resolution
        };
        trace.emit(
            ThoughtKind::Correction,
            format!("Corrected the answer to {}", format_number(evaluation.answer)),
            corrected.confidence,
        );
        (corrected, true)
    }
}

impl Default for Verifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate `n0 op0 n1 op1 ...` through an operator stack.
///
/// Returns `None` on a zero divisor or a malformed chain.
fn shunting_yard(numbers: &[f64], operators: &[Operator]) -> Option<f64> {
    let mut output: Vec<f64> = Vec::with_capacity(numbers.len());
    let mut stack: Vec<Operator> = Vec::with_capacity(operators.len());

    fn reduce(output: &mut Vec<f64>, op: Operator) -> Option<()> {
        let b = output.pop()?;
        let a = output.pop()?;
        output.push(op.apply(a, b)?);
        Some(())
    }

    output.push(*numbers.first()?);
    for (op, &number) in operators.iter().zip(&numbers[1..]) {
        while let Some(&top) = stack.last() {
            if top.precedence() < op.precedence() {
                break;
            }
            stack.pop();
            reduce(&mut output, top)?;
        }
        stack.push(*op);
        output.push(number);
    }
    while let Some(op) = stack.pop() {
        reduce(&mut output, op)?;
    }

    match output.as_slice() {
        [value] => Some(*value),
        _ => None,
    }
}
