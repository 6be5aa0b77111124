//! Normalization and tagged-variant lexing of arithmetic text.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Natural-language operator phrases rewritten into symbolic form.
///
/// Prefix forms with explicit operands run before the infix words.
static PHRASES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    const NUM: &str = r"(\d+(?:\.\d+)?)";
    let rules = [
        (format!(r"\bmultiply\s+{NUM}\s+(?:by|and|with)\s+{NUM}"), "${1} * ${2}"),
        (format!(r"\bdivide\s+{NUM}\s+by\s+{NUM}"), "${1} / ${2}"),
        (format!(r"\badd\s+{NUM}\s+(?:and|to)\s+{NUM}"), "${1} + ${2}"),
        (format!(r"\bsubtract\s+{NUM}\s+from\s+{NUM}"), "${2} - ${1}"),
        (format!(r"\bsum\s+of\s+{NUM}\s+and\s+{NUM}"), "${1} + ${2}"),
        (format!(r"\bproduct\s+of\s+{NUM}\s+and\s+{NUM}"), "${1} * ${2}"),
        (format!(r"\bdifference\s+(?:between|of)\s+{NUM}\s+and\s+{NUM}"), "${1} - ${2}"),
        (r"\bmultiplied\s+by\b".to_string(), " * "),
        (r"\bdivided\s+by\b".to_string(), " / "),
        (r"\btimes\b".to_string(), " * "),
        (r"\bplus\b".to_string(), " + "),
        (r"\bminus\b".to_string(), " - "),
    ];

    rules
        .into_iter()
        .map(|(pattern, replacement)| {
            (
                Regex::new(&pattern).expect("operator phrase patterns are valid"),
                replacement,
            )
        })
        .collect()
});

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Parse a canonical operator character.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Sub),
            '*' => Some(Self::Mul),
            '/' => Some(Self::Div),
            _ => None,
        }
    }

    /// Glyph used in step strings.
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "×",
            Self::Div => "÷",
        }
    }

    /// Binding strength; multiplicative operators bind tighter.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    /// Whether this is `*` or `/`.
    pub fn is_multiplicative(&self) -> bool {
        self.precedence() == 2
    }

    /// Apply the operator. Division by zero yields `None`.
    pub fn apply(&self, a: f64, b: f64) -> Option<f64> {
        match self {
            Self::Add => Some(a + b),
            Self::Sub => Some(a - b),
            Self::Mul => Some(a * b),
            Self::Div if b == 0.0 => None,
            Self::Div => Some(a / b),
        }
    }
}

/// A lexed token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Arithmetic operator
    Operator(Operator),
    /// Anything else (words, punctuation)
    Unknown(String),
}

/// Something the lexer chose to interpret or ignore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// `x` between two numbers was read as multiplication
    ImplicitMultiplication { position: usize },
    /// A symbol with arithmetic meaning that is not supported was skipped
    UnsupportedSymbol { symbol: char, position: usize },
}

impl ParseWarning {
    /// Human-readable description.
    pub fn describe(&self) -> String {
        match self {
            Self::ImplicitMultiplication { position } => {
                format!("Read 'x' at position {} as multiplication", position)
            }
            Self::UnsupportedSymbol { symbol, position } => {
                format!("Ignored unsupported symbol '{}' at position {}", symbol, position)
            }
        }
    }
}

/// Result of lexing normalized text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexed {
    /// Tokens in order
    pub tokens: Vec<Token>,
    /// Warnings raised while lexing
    pub warnings: Vec<ParseWarning>,
}

impl Lexed {
    /// Numeric literals in order.
    pub fn numbers(&self) -> Vec<f64> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Number(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Operators in order.
    pub fn operators(&self) -> Vec<Operator> {
        self.tokens
            .iter()
            .filter_map(|t| match t {
                Token::Operator(op) => Some(*op),
                _ => None,
            })
            .collect()
    }
}

/// Lower-case, rewrite operator phrases and glyphs, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let mut normalized = text.to_lowercase();

    for (pattern, replacement) in PHRASES.iter() {
        normalized = pattern.replace_all(&normalized, *replacement).into_owned();
    }

    let normalized: String = normalized
        .chars()
        .map(|c| match c {
            '×' | '✕' | '✖' | '·' | '∗' => '*',
            '÷' | '∕' => '/',
            '−' | '–' => '-',
            other => other,
        })
        .collect();

    normalized.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lex normalized text into tagged tokens.
///
/// A `-` directly before a digit is a sign when no number precedes it.
/// With `implicit_multiplication`, a standalone `x` sitting between a digit
/// and a digit becomes `*` and records a warning.
pub fn lex(normalized: &str, implicit_multiplication: bool) -> Lexed {
    let chars: Vec<char> = normalized.chars().collect();
    let mut lexed = Lexed::default();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let starts_number = c.is_ascii_digit()
            || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()));
        let signed = c == '-'
            && !matches!(last_arithmetic(&lexed.tokens), Some(Token::Number(_)))
            && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());

        if starts_number || signed {
            let start = i;
            if signed {
                i += 1;
            }
            i = scan_number(&chars, i);
            let literal: String = chars[start..i].iter().collect();
            match literal.parse::<f64>() {
                Ok(value) => lexed.tokens.push(Token::Number(value)),
                Err(_) => lexed.tokens.push(Token::Unknown(literal)),
            }
            continue;
        }

        if let Some(op) = Operator::from_symbol(c) {
            lexed.tokens.push(Token::Operator(op));
            i += 1;
            continue;
        }

        if c.is_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_alphabetic() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();

            if implicit_multiplication
                && word == "x"
                && digit_before(&chars, start)
                && digit_after(&chars, i)
                && matches!(last_arithmetic(&lexed.tokens), Some(Token::Number(_)))
            {
                lexed.tokens.push(Token::Operator(Operator::Mul));
                lexed
                    .warnings
                    .push(ParseWarning::ImplicitMultiplication { position: start });
            } else {
                lexed.tokens.push(Token::Unknown(word));
            }
            continue;
        }

        if matches!(c, '^' | '(' | ')' | '%') {
            lexed
                .warnings
                .push(ParseWarning::UnsupportedSymbol { symbol: c, position: i });
        }
        lexed.tokens.push(Token::Unknown(c.to_string()));
        i += 1;
    }

    lexed
}

fn scan_number(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i + 1 < chars.len() && chars[i] == '.' && chars[i + 1].is_ascii_digit() {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
    }
    i
}

fn last_arithmetic(tokens: &[Token]) -> Option<&Token> {
    tokens
        .iter()
        .rev()
        .find(|t| !matches!(t, Token::Unknown(_)))
}

fn digit_before(chars: &[char], index: usize) -> bool {
    chars[..index]
        .iter()
        .rev()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| c.is_ascii_digit())
}

fn digit_after(chars: &[char], index: usize) -> bool {
    chars[index..]
        .iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| c.is_ascii_digit())
}
