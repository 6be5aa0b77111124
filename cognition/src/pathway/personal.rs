//! Personal pathway - fact extraction and household counting.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::{Pathway, PathwayContext};
use crate::facts::FactSuggestion;
use crate::types::{Category, CategoryResult, PersonalDetails};

const SELF_PROMPTS: &[&str] = &[
    "What is this person telling me about themselves?",
    "Are there quantities I can reason about?",
    "Who counts as part of their household?",
    "How should I acknowledge what they shared?",
];

const DERIVED_CONFIDENCE: f64 = 0.95;
const EXTRACTED_CONFIDENCE: f64 = 0.7;

/// Name patterns; the flag marks patterns whose capture may be a state
/// ("I am Happy") rather than a name.
static NAME_PATTERNS: LazyLock<Vec<(Regex, bool)>> = LazyLock::new(|| {
    [
        (r"(?i)\bmy\s+name\s+is\s+([a-z][a-z'\-]*)", false),
        (r"(?i)\bcall\s+me\s+([a-z][a-z'\-]*)", false),
        // "I am" only counts when followed by a capitalized word
        (r"\b(?:[Ii]\s+am|[Ii]'m)\s+([A-Z][A-Za-z'\-]*)", true),
    ]
    .iter()
    .map(|(p, ambiguous)| (Regex::new(p).expect("name patterns are valid"), *ambiguous))
    .collect()
});

/// Capitalized words after "I am" that describe a state, not a name.
const NOT_NAMES: &[&str] = &[
    "afraid", "also", "angry", "back", "bored", "busy", "confused", "done", "excited", "feeling",
    "fine", "glad", "going", "good", "happy", "here", "hungry", "just", "looking", "lost",
    "married", "new", "not", "ok", "okay", "ready", "really", "sad", "single", "so", "sorry",
    "still", "sure", "thinking", "tired", "trying", "very", "well", "worried",
];

static QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(\d+)\s+([a-z]+)\b").expect("quantity pattern is valid"));

/// Whether a counted noun is a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NounKind {
    Relation,
    Possession,
}

/// Surface forms, canonical key, kind.
const NOUNS: &[(&[&str], &str, NounKind)] = &[
    (&["wife", "wives"], "wife", NounKind::Relation),
    (&["husband", "husbands"], "husband", NounKind::Relation),
    (&["partner", "partners", "spouse", "spouses"], "partner", NounKind::Relation),
    (&["son", "sons"], "son", NounKind::Relation),
    (&["daughter", "daughters"], "daughter", NounKind::Relation),
    (&["kid", "kids", "child", "children"], "child", NounKind::Relation),
    (&["baby", "babies"], "baby", NounKind::Relation),
    (&["brother", "brothers"], "brother", NounKind::Relation),
    (&["sister", "sisters"], "sister", NounKind::Relation),
    (&["sibling", "siblings"], "sibling", NounKind::Relation),
    (&["parent", "parents"], "parent", NounKind::Relation),
    (&["roommate", "roommates", "flatmate", "flatmates"], "roommate", NounKind::Relation),
    (&["grandparent", "grandparents"], "grandparent", NounKind::Relation),
    (&["cat", "cats", "kitten", "kittens"], "cat", NounKind::Possession),
    (&["dog", "dogs", "puppy", "puppies"], "dog", NounKind::Possession),
    (&["pet", "pets"], "pet", NounKind::Possession),
    (&["fish", "goldfish"], "fish", NounKind::Possession),
    (&["bird", "birds", "parrot", "parrots"], "bird", NounKind::Possession),
    (&["hamster", "hamsters", "rabbit", "rabbits"], "rodent", NounKind::Possession),
    (&["horse", "horses"], "horse", NounKind::Possession),
    (&["car", "cars"], "car", NounKind::Possession),
    (&["bike", "bikes", "bicycle", "bicycles"], "bike", NounKind::Possession),
    (&["house", "houses"], "house", NounKind::Possession),
];

const HOUSEHOLD_WORDS: &[&str] = &["household", "family", "home", "house", "live"];

fn classify_noun(word: &str) -> Option<(&'static str, NounKind)> {
    let word = word.to_lowercase();
    NOUNS
        .iter()
        .find(|(forms, _, _)| forms.contains(&word.as_str()))
        .map(|(_, key, kind)| (*key, *kind))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Extracts names and counted relations or possessions.
#[derive(Debug, Clone, Default)]
pub struct PersonalPathway;

impl PersonalPathway {
    /// Create a new personal pathway.
    pub fn new() -> Self {
        Self
    }

    /// Extract a stated name.
    pub fn extract_name(&self, utterance: &str) -> Option<String> {
        NAME_PATTERNS.iter().find_map(|(re, ambiguous)| {
            let word = re.captures(utterance)?.get(1)?.as_str();
            if *ambiguous && NOT_NAMES.contains(&word.to_lowercase().as_str()) {
                return None;
            }
            Some(capitalize(word))
        })
    }

    /// Extract counted relations and possessions, in mention order.
    pub fn extract_quantities(&self, utterance: &str) -> (Vec<(String, u32)>, Vec<(String, u32)>) {
        let mut relations = Vec::new();
        let mut possessions = Vec::new();

        for caps in QUANTITY.captures_iter(utterance) {
            let Ok(count) = caps[1].parse::<u32>() else {
                continue;
            };
            match classify_noun(&caps[2]) {
                Some((key, NounKind::Relation)) => relations.push((key.to_string(), count)),
                Some((key, NounKind::Possession)) => possessions.push((key.to_string(), count)),
                None => {}
            }
        }

        (relations, possessions)
    }
}

impl Pathway for PersonalPathway {
    fn category(&self) -> Category {
        Category::Personal
    }

    fn self_prompts(&self) -> &[&'static str] {
        SELF_PROMPTS
    }

    fn process(&self, ctx: &PathwayContext<'_>) -> CategoryResult {
        let name = self.extract_name(ctx.utterance);
        let (relations, possessions) = self.extract_quantities(ctx.utterance);

        let mut suggestions = Vec::new();
        let mut summary = Vec::new();

        if let Some(name) = &name {
            suggestions.push(FactSuggestion::new("name", name.clone(), 0.9));
            summary.push(format!("name={}", name));
        }
        for (key, count) in &relations {
            suggestions.push(FactSuggestion::new(
                format!("relation.{}", key),
                count.to_string(),
                0.85,
            ));
            summary.push(format!("{}={}", key, count));
        }
        for (key, count) in &possessions {
            suggestions.push(FactSuggestion::new(
                format!("possession.{}", key),
                count.to_string(),
                0.85,
            ));
            summary.push(format!("{}={}", key, count));
        }

        // Household size counts the speaker plus every person-denoting relation
        let household = if relations.is_empty() {
            remembered_household(ctx)
        } else {
            let size = household_size(&relations);
            match size {
                Some(size) => suggestions.push(FactSuggestion::new(
                    "household_size",
                    size.to_string(),
                    0.95,
                )),
                None => debug!(relations = relations.len(), "Household count overflowed"),
            }
            size
        };

        let details = PersonalDetails {
            remembered_name: name
                .is_none()
                .then(|| ctx.facts.get("name").map(str::to_string))
                .flatten(),
            name,
            relations,
            possessions,
        };

        let content = if summary.is_empty() {
            "Nothing structured to extract".to_string()
        } else {
            format!("Extracted {}", summary.join(", "))
        };

        let mut result = match household {
            Some(size) => CategoryResult::new(Category::Personal, content, DERIVED_CONFIDENCE)
                .with_answer(
                    f64::from(size),
                    vec![format!("1 (you) + relations = {}", size)],
                )
                .with_next_thought("Confirm the household count with them"),
            None => CategoryResult::new(Category::Personal, content, EXTRACTED_CONFIDENCE)
                .with_next_thought("Consider who else might be part of their life"),
        };
        result.suggestions = suggestions;
        result.details = Some(details);
        result
    }
}

/// One for the speaker plus every relation; `None` on overflow.
fn household_size(relations: &[(String, u32)]) -> Option<u32> {
    relations
        .iter()
        .try_fold(1u32, |total, (_, count)| total.checked_add(*count))
}

/// Household size from the snapshot, when the user asks about it.
fn remembered_household(ctx: &PathwayContext<'_>) -> Option<u32> {
    let lower = ctx.utterance.to_lowercase();
    if !lower.contains("how many") || !HOUSEHOLD_WORDS.iter().any(|w| lower.contains(w)) {
        return None;
    }
    ctx.facts.get("household_size")?.parse().ok()
}
