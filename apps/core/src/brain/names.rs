//! Person-name extraction.
//!
//! The dialogue only needs "is there a person name in this utterance, and what
//! is it". That capability sits behind [`NameExtractor`] so a statistical NER
//! model can replace the rule-based default without touching the dialogue.
//!
//! Introductions come in two strengths. "My name is", "name's" and "call me"
//! are taken at their word. "I am", "I'm" and "this is" are just as often
//! followed by a state ("I'm Studying", "This is Urgent"), so their candidates
//! must also not look like a participle or a known adjective, and the rest of
//! the utterance must not be an enquiry the intent table recognises.

use super::intent::IntentMatcher;
use super::tokenizer::Tokenizer;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Finds the first person name mentioned in a piece of text.
pub trait NameExtractor: Send + Sync + 'static {
    /// Returns the literal text of the first person name, or `None`.
    fn extract_person_name(&self, text: &str) -> Option<String>;
}

// Introduction phrase (any case) followed by up to three capitalised words.
// NOTE: expect() is acceptable here, the pattern is a compile-time constant.
static INTRODUCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|\b)(?i:(?P<strong>my\s+name\s+is|my\s+name['’]s|name['’]s|call\s+me)|(?P<weak>i\s+am|i['’]m|this\s+is))\s+(?P<name>\p{Lu}[\p{L}'’-]*(?:\s+\p{Lu}[\p{L}'’-]*){0,2})",
    )
    .expect("Invalid regex: introduction pattern")
});

/// Capitalised words that follow an introduction without being names.
const NOT_NAMES: &[&str] = &[
    "looking", "interested", "good", "fine", "great", "ok", "okay", "new", "from", "ready",
    "planning", "trying", "sorry", "happy", "thinking", "asking", "ielts", "pte", "naati",
    "urgent", "busy", "curious", "confused", "eager", "excited", "keen", "nervous", "unsure",
    "available", "free", "glad", "sure", "tired", "worried", "stuck", "late", "early", "student",
    "important",
];

/// Rule-based extractor: recognises self-introductions such as
/// "My name is Priya" or "I'm Priya Sharma".
pub struct RuleBasedNameExtractor {
    tokenizer: Tokenizer,
    topic_guard: Option<IntentMatcher>,
}

impl Default for RuleBasedNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedNameExtractor {
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            topic_guard: None,
        }
    }

    /// Rejects weak introductions ("I'm ...", "this is ...") whose utterance
    /// also matches one of these intents.
    pub fn with_topic_guard(mut self, matcher: IntentMatcher) -> Self {
        self.topic_guard = Some(matcher);
        self
    }

    fn is_name_word(&self, word: &str, weak: bool) -> bool {
        let lower = word.to_lowercase();
        if lower.is_empty()
            || self.tokenizer.is_stopword(&lower)
            || NOT_NAMES.contains(&lower.as_str())
        {
            return false;
        }
        !(weak && looks_like_participle(&lower))
    }

    /// Whether the utterance outside the name span asks about a known topic.
    fn mentions_topic(&self, text: &str, name: Range<usize>) -> bool {
        let Some(matcher) = &self.topic_guard else {
            return false;
        };
        let rest = format!("{} {}", &text[..name.start], &text[name.end..]);
        matcher.find(&self.tokenizer.normalize(&rest)).is_some()
    }
}

impl NameExtractor for RuleBasedNameExtractor {
    fn extract_person_name(&self, text: &str) -> Option<String> {
        INTRODUCTION.captures_iter(text).find_map(|caps| {
            let weak = caps.name("weak").is_some();
            let span = caps.name("name")?;

            let mut words = Vec::new();
            for raw in span.as_str().split_whitespace() {
                let (word, possessive) = strip_possessive(raw);
                if !self.is_name_word(word, weak) {
                    break;
                }
                words.push(word);
                if possessive {
                    break;
                }
            }
            if words.is_empty() || (weak && self.mentions_topic(text, span.range())) {
                return None;
            }
            Some(words.join(" "))
        })
    }
}

/// "-ing" and "-ed" forms ("Studying", "Confused") describe a state, not a person.
fn looks_like_participle(lower: &str) -> bool {
    (lower.len() > 4 && lower.ends_with("ing")) || (lower.len() > 5 && lower.ends_with("ed"))
}

/// Drops trailing apostrophes/hyphens and a possessive "'s". The flag is set
/// when a possessive was removed, which ends the name.
fn strip_possessive(word: &str) -> (&str, bool) {
    let word = word.trim_end_matches(['\'', '’', '-']);
    match word.strip_suffix("'s").or_else(|| word.strip_suffix("’s")) {
        Some(stem) => (stem, true),
        None => (word, false),
    }
}

/// Extractor that never finds a name. Useful where introductions must not be
/// captured, or in tests that exercise the rest of the cascade.
pub struct NoNames;

impl NameExtractor for NoNames {
    fn extract_person_name(&self, _text: &str) -> Option<String> {
        None
    }
}
