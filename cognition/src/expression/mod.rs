//! Arithmetic expression evaluation.
//!
//! Text is normalized (operator phrases and glyphs rewritten), lexed into
//! tagged tokens, then reduced in two left-to-right passes: `*`/`/` first,
//! `+`/`-` second.

mod evaluator;
mod lexer;

pub use evaluator::{format_number, Evaluation, Evaluator, DIVIDE_BY_ZERO};
pub use lexer::{lex, normalize, Lexed, Operator, ParseWarning, Token};
