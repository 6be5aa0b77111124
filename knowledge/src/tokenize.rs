//! Word tokenization for knowledge queries.

/// Words that carry no topical signal in a question.
const STOP_WORDS: &[&str] = &[
    "about", "and", "are", "can", "could", "define", "describe", "does", "explain", "for", "from",
    "have", "how", "please", "should", "tell", "that", "the", "this", "was", "were", "what",
    "when", "where", "which", "who", "why", "will", "with", "would", "you", "your",
];

/// Split text into lower-case alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokens suitable for a knowledge query.
///
/// Drops stop words and tokens shorter than `min_len` characters so that
/// fragments like "a" or "is" do not match every entry.
pub fn query_tokens(text: &str, min_len: usize) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= min_len)
        .filter(|t| !STOP_WORDS.contains(&t.as_str()))
        .collect()
}
