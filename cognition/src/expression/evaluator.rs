//! Two-pass precedence evaluator.

use tracing::debug;

use super::lexer::{lex, normalize, Lexed, ParseWarning};
use crate::config::EvaluatorConfig;

/// Step text recorded when a divisor is zero.
pub const DIVIDE_BY_ZERO: &str = "Cannot divide by zero";

/// A successful evaluation.
///
/// `answer` is NaN when evaluation hit a zero divisor; `steps` then holds
/// only [`DIVIDE_BY_ZERO`].
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Computed value
    pub answer: f64,
    /// Reduction steps, multiplicative first
    pub steps: Vec<String>,
    /// Lexer warnings
    pub warnings: Vec<ParseWarning>,
}

impl Evaluation {
    /// Whether the answer is a finite number.
    pub fn is_defined(&self) -> bool {
        self.answer.is_finite()
    }
}

/// Arithmetic evaluator over natural-language or symbolic text.
#[derive(Debug, Clone)]
pub struct Evaluator {
    implicit_multiplication: bool,
}

impl Evaluator {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::with_config(&EvaluatorConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: &EvaluatorConfig) -> Self {
        Self {
            implicit_multiplication: config.implicit_multiplication,
        }
    }

    /// Normalize and lex text.
    pub fn lex(&self, text: &str) -> Lexed {
        lex(&normalize(text), self.implicit_multiplication)
    }

    /// Evaluate arithmetic in `text`.
    ///
    /// Returns `None` when no number is present or when the operator count
    /// does not match the operand count.
    pub fn evaluate(&self, text: &str) -> Option<Evaluation> {
        let lexed = self.lex(text);
        let mut numbers = lexed.numbers();
        let mut operators = lexed.operators();

        if numbers.is_empty() {
            return None;
        }
        if operators.len() + 1 != numbers.len() {
            debug!(
                numbers = numbers.len(),
                operators = operators.len(),
                "Malformed expression"
            );
            return None;
        }

        let mut steps = Vec::with_capacity(operators.len());

        for multiplicative in [true, false] {
            let mut i = 0;
            while i < operators.len() {
                let op = operators[i];
                if op.is_multiplicative() != multiplicative {
                    i += 1;
                    continue;
                }

                let (a, b) = (numbers[i], numbers[i + 1]);
                let Some(result) = op.apply(a, b) else {
                    return Some(Evaluation {
                        answer: f64::NAN,
                        steps: vec![DIVIDE_BY_ZERO.to_string()],
                        warnings: lexed.warnings,
                    });
                };

                steps.push(format!(
                    "{} {} {} = {}",
                    format_number(a),
                    op.glyph(),
                    format_number(b),
                    format_number(result)
                ));
                numbers[i] = result;
                numbers.remove(i + 1);
                operators.remove(i);
            }
        }

        Some(Evaluation {
            answer: numbers[0],
            steps,
            warnings: lexed.warnings,
        })
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a number without a trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    let text = format!("{:.10}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> Evaluation {
        Evaluator::new().evaluate(text).unwrap()
    }

    #[test]
    fn test_binary_operations_match_native_arithmetic() {
        let pairs: [(i64, i64); 6] = [(7, 3), (12, 4), (-5, 2), (0, 9), (100, -7), (3, 3)];
        for (a, b) in pairs {
            let af = a as f64;
            let bf = b as f64;
            let cases = [
                (format!("{a} + {b}"), af + bf),
                (format!("{a} - {b}"), af - bf),
                (format!("{a} * {b}"), af * bf),
                (format!("{a} / {b}"), af / bf),
            ];
            for (text, expected) in cases {
                let result = eval(&text);
                assert!(
                    (result.answer - expected).abs() < 1e-9,
                    "{} gave {}, expected {}",
                    text,
                    result.answer,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_divide_by_zero() {
        let result = eval("10/0");
        assert!(result.answer.is_nan());
        assert_eq!(result.steps, vec![DIVIDE_BY_ZERO.to_string()]);
        assert!(!result.is_defined());
    }

    #[test]
    fn test_precedence_steps() {
        let result = eval("2+3*4");
        assert_eq!(result.answer, 14.0);
        assert_eq!(result.steps, vec!["3 × 4 = 12", "2 + 12 = 14"]);
    }

    #[test]
    fn test_unicode_times() {
        assert_eq!(eval("3×3+3").answer, 12.0);
    }

    #[test]
    fn test_left_to_right_within_precedence() {
        let result = eval("20 / 5 * 2 - 3 - 1");
        assert_eq!(result.answer, 4.0);
        assert_eq!(
            result.steps,
            vec!["20 ÷ 5 = 4", "4 × 2 = 8", "8 - 3 = 5", "5 - 1 = 4"]
        );
    }

    #[test]
    fn test_single_number_returns_itself() {
        let result = eval("just 42");
        assert_eq!(result.answer, 42.0);
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_no_numbers_is_none() {
        assert!(Evaluator::new().evaluate("what is love").is_none());
    }

    #[test]
    fn test_malformed_is_none() {
        assert!(Evaluator::new().evaluate("3 + + 4").is_none());
        assert!(Evaluator::new().evaluate("1 2").is_none());
    }

    #[test]
    fn test_natural_language() {
        assert_eq!(eval("What is multiply 6 by 7?").answer, 42.0);
        assert_eq!(eval("subtract 4 from 10").answer, 6.0);
        assert_eq!(eval("9 divided by 3 plus 1").answer, 4.0);
        assert_eq!(eval("5 times 5 minus 5").answer, 20.0);
    }

    #[test]
    fn test_implicit_multiplication_warning_carried() {
        let result = eval("4x5");
        assert_eq!(result.answer, 20.0);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}
