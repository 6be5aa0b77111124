//! Input classifier - turns an utterance into an [`InputSpark`].

use knowledge::tokenize::tokenize;

use crate::types::{clamp01, Category, InputFeatures, InputSpark};

/// Words that mark an arithmetic request when digits are present.
const OPERATOR_WORDS: &[&str] = &[
    "multiply", "multiplied", "times", "divide", "divided", "plus", "minus", "subtract", "add",
    "sum", "product",
];

/// Leading words that make an utterance a question.
const INTERROGATIVES: &[&str] = &[
    "what", "who", "where", "when", "why", "how", "which", "is", "are", "can", "could", "do",
    "does", "will", "would", "should", "explain", "define", "describe",
];

/// Single-token first-person markers.
const PERSONAL_WORDS: &[&str] = &["my", "mine", "myself", "our", "ours"];

/// Two-token first-person markers.
const PERSONAL_PHRASES: &[(&str, &str)] = &[
    ("i", "am"),
    ("i", "m"),
    ("i", "have"),
    ("i", "ve"),
    ("i", "live"),
    ("call", "me"),
    ("we", "have"),
];

/// Classification confidences per category.
const MATHEMATICAL_CONFIDENCE: f64 = 0.9;
const PERSONAL_CONFIDENCE: f64 = 0.8;
const INQUIRY_CONFIDENCE: f64 = 0.7;
const CONVERSATIONAL_CONFIDENCE: f64 = 0.5;

/// Stateless lexical classifier.
#[derive(Debug, Clone, Default)]
pub struct InputClassifier;

impl InputClassifier {
    /// Create a new classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify an utterance. Pure function of the input.
    pub fn classify(&self, utterance: &str) -> InputSpark {
        let words = tokenize(utterance);
        let chars: Vec<char> = utterance.chars().collect();

        let digit_groups = count_digit_groups(&chars);
        let operator_count = count_operators(&chars);
        let question_marks = chars.iter().filter(|&&c| c == '?').count();

        let has_numbers = digit_groups > 0;
        let has_operators = operator_count > 0;
        let has_operator_word = words.iter().any(|w| OPERATOR_WORDS.contains(&w.as_str()));
        let has_question_markers = question_marks > 0
            || words
                .first()
                .is_some_and(|w| INTERROGATIVES.contains(&w.as_str()));
        let has_personal_markers = words.iter().any(|w| PERSONAL_WORDS.contains(&w.as_str()))
            || words
                .windows(2)
                .any(|pair| PERSONAL_PHRASES.contains(&(pair[0].as_str(), pair[1].as_str())));

        let complexity_score = clamp01(
            0.3 * (chars.len() as f64 / 100.0).min(1.0)
                + 0.1 * operator_count as f64
                + 0.1 * digit_groups as f64
                + 0.1 * question_marks as f64,
        );

        let features = InputFeatures {
            has_numbers,
            has_operators,
            has_question_markers,
            has_personal_markers,
            word_count: utterance.split_whitespace().count(),
            complexity_score,
        };

        let (category, confidence) = if has_numbers && (has_operators || has_operator_word) {
            (Category::Mathematical, MATHEMATICAL_CONFIDENCE)
        } else if has_personal_markers {
            (Category::Personal, PERSONAL_CONFIDENCE)
        } else if has_question_markers {
            (Category::Inquiry, INQUIRY_CONFIDENCE)
        } else {
            (Category::Conversational, CONVERSATIONAL_CONFIDENCE)
        };

        InputSpark {
            category,
            confidence,
            features,
        }
    }
}

/// Maximal runs of ASCII digits.
fn count_digit_groups(chars: &[char]) -> usize {
    chars
        .iter()
        .enumerate()
        .filter(|&(i, c)| c.is_ascii_digit() && (i == 0 || !chars[i - 1].is_ascii_digit()))
        .count()
}

/// Operator glyphs, plus an `x` or `X` between digits (`4x5` or `4 x 5`).
fn count_operators(chars: &[char]) -> usize {
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| match c {
            '+' | '-' | '*' | '/' | '×' | '÷' | '^' | '=' | '−' => true,
            'x' | 'X' => digit_before(chars, i) && digit_after(chars, i + 1),
            _ => false,
        })
        .count()
}

/// Nearest non-space character before `index` is a digit.
fn digit_before(chars: &[char], index: usize) -> bool {
    chars[..index]
        .iter()
        .rev()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| c.is_ascii_digit())
}

/// Nearest non-space character from `index` on is a digit.
fn digit_after(chars: &[char], index: usize) -> bool {
    chars[index..]
        .iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> InputSpark {
        InputClassifier::new().classify(text)
    }

    #[test]
    fn test_symbolic_math() {
        let spark = classify("2+3*4");
        assert_eq!(spark.category, Category::Mathematical);
        assert_eq!(spark.confidence, 0.9);
        assert!(spark.features.has_numbers);
        assert!(spark.features.has_operators);
    }

    #[test]
    fn test_operator_words_with_digits() {
        assert_eq!(classify("multiply 6 by 7").category, Category::Mathematical);
        assert_eq!(classify("what is 3 times 9").category, Category::Mathematical);
        assert_eq!(classify("4x5").category, Category::Mathematical);
    }

    #[test]
    fn test_spaced_x_between_digits() {
        let spark = classify("what is 5 x 6");
        assert_eq!(spark.category, Category::Mathematical);
        assert!(spark.features.has_operators);

        // x inside a word or without digits on both sides is not an operator
        assert!(!classify("I saw 5 xylophones").features.has_operators);
        assert!(!classify("box 3").features.has_operators);
    }

    #[test]
    fn test_operator_word_without_digits_is_not_math() {
        assert_eq!(classify("how do I multiply fractions?").category, Category::Inquiry);
    }

    #[test]
    fn test_personal() {
        let spark = classify("My name is Ron and I have 1 wife and 2 cats");
        assert_eq!(spark.category, Category::Personal);
        assert_eq!(spark.confidence, 0.8);
        assert!(spark.features.has_personal_markers);
        assert!(!spark.features.has_operators);
    }

    #[test]
    fn test_inquiry() {
        let spark = classify("What is photosynthesis?");
        assert_eq!(spark.category, Category::Inquiry);
        assert_eq!(spark.confidence, 0.7);

        assert_eq!(classify("explain gravity").category, Category::Inquiry);
    }

    #[test]
    fn test_conversational() {
        let spark = classify("Tell me a joke");
        assert_eq!(spark.category, Category::Conversational);
        assert!((spark.confidence - 0.5).abs() < f64::EPSILON);
        assert!(!spark.features.has_numbers);
        assert!(!spark.features.has_operators);
        assert!(!spark.features.has_question_markers);
        assert!(!spark.features.has_personal_markers);
        assert_eq!(spark.features.word_count, 4);
    }

    #[test]
    fn test_complexity_score() {
        // 5 chars, 2 operators, 3 digit groups
        let spark = classify("2+3*4");
        let expected = 0.3 * 0.05 + 0.1 * 2.0 + 0.1 * 3.0;
        assert!((spark.features.complexity_score - expected).abs() < 1e-9);

        let busy = classify("1+2+3+4+5+6+7+8+9?");
        assert_eq!(busy.features.complexity_score, 1.0);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let text = "I'm Ada, how are you?";
        assert_eq!(classify(text), classify(text));
        assert_eq!(classify(text).category, Category::Personal);
    }
}
