//! Response phrasing templates.
//!
//! Selection is the only randomized step in a run and it never affects
//! category, confidence or answer.

use rand::seq::SliceRandom;
use rand::Rng;

/// Replies when nothing better is available.
pub const FALLBACK_RESPONSES: &[&str] = &[
    "I hear you. Tell me more about what's on your mind.",
    "That's interesting. What would you like to explore next?",
    "I'm not sure I have much to add, but I'm listening.",
    "Thanks for sharing that. Is there something specific I can help with?",
];

/// Greetings; `{name}` is replaced with the user's name.
pub const GREETINGS: &[&str] = &[
    "Nice to meet you, {name}!",
    "Hello, {name}!",
    "Great to hear from you, {name}.",
];

/// Acknowledgments of personal details.
pub const ACKNOWLEDGMENTS: &[&str] = &[
    "Thanks for telling me about yourself.",
    "I'll keep that in mind.",
    "Good to know a little more about you.",
];

/// Pick one template.
pub fn pick<R: Rng + ?Sized>(templates: &[&'static str], rng: &mut R) -> &'static str {
    templates.choose(rng).copied().unwrap_or_default()
}

/// Pick a greeting for `name`.
pub fn greeting<R: Rng + ?Sized>(name: &str, rng: &mut R) -> String {
    pick(GREETINGS, rng).replace("{name}", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_is_seeded() {
        let a = pick(FALLBACK_RESPONSES, &mut StdRng::seed_from_u64(7));
        let b = pick(FALLBACK_RESPONSES, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(FALLBACK_RESPONSES.contains(&a));
    }

    #[test]
    fn test_greeting_substitutes_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = greeting("Ron", &mut rng);
        assert!(text.contains("Ron"));
        assert!(!text.contains("{name}"));
    }

    #[test]
    fn test_pick_empty() {
        assert_eq!(pick(&[], &mut StdRng::seed_from_u64(0)), "");
    }
}
