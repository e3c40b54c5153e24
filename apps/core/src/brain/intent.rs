//! Intent matching using per-token regex patterns.
//!
//! Every enquiry topic owns exactly one pattern. Patterns are searched against
//! single tokens, never the whole utterance, and the first hit wins:
//! tokens in document order form the outer loop, the declared intent order the
//! inner loop. There is no scoring.

use crate::error::AppError;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enquiry topic the responder knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Course catalogue (class, course, offer)
    Classes,
    /// IELTS coaching
    Ielts,
    /// Pricing (fees, cost, price)
    Fees,
    /// Batch dates and timing
    Schedule,
    /// Phone number and email
    Contact,
    /// Remote learning
    Online,
    /// Branch locations
    Location,
    /// Trainers
    Instructor,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// The closed set of intents, in default priority order.
    pub const ALL: [Intent; 8] = [
        Intent::Classes,
        Intent::Ielts,
        Intent::Fees,
        Intent::Schedule,
        Intent::Contact,
        Intent::Online,
        Intent::Location,
        Intent::Instructor,
    ];

    /// Returns the label used in configuration files and logs
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Classes => "classes",
            Intent::Ielts => "ielts",
            Intent::Fees => "fees",
            Intent::Schedule => "schedule",
            Intent::Contact => "contact",
            Intent::Online => "online",
            Intent::Location => "location",
            Intent::Instructor => "instructor",
        }
    }
}

/// Built-in pattern table. Multi-word alternatives such as "next batch" can never
/// match a single token; they are kept so the table reads like the enquiry script.
pub const DEFAULT_PATTERNS: [(Intent, &str); 8] = [
    (Intent::Classes, r"(class|course|types of classes|offer)"),
    (Intent::Ielts, r"(ielts|ielts coaching)"),
    (Intent::Fees, r"(fees|cost|price|fee)"),
    (Intent::Schedule, r"(schedule|next batch|time)"),
    (Intent::Contact, r"(contact|phone number|email)"),
    (Intent::Online, r"(online classes|remote|virtual)"),
    (Intent::Location, r"(where|location|branch)"),
    (Intent::Instructor, r"(instructor|teacher|trainer|certified)"),
];

/// A successful match: which intent fired and on which token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub intent: Intent,
    /// The token the pattern was found in
    pub token: String,
    /// The substring of the token the pattern matched
    pub matched: String,
}

#[derive(Clone)]
struct IntentPattern {
    intent: Intent,
    pattern: Regex,
}

/// Ordered (intent, pattern) table evaluated as a nested loop.
#[derive(Clone)]
pub struct IntentMatcher {
    patterns: Vec<IntentPattern>,
}

impl IntentMatcher {
    /// Compiles an ordered pattern table. Patterns are case-insensitive.
    pub fn from_patterns<'a, I>(entries: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (Intent, &'a str)>,
    {
        let mut patterns = Vec::new();
        for (intent, source) in entries {
            if patterns.iter().any(|p: &IntentPattern| p.intent == intent) {
                return Err(AppError::Config(format!(
                    "Intent '{}' declared more than once",
                    intent
                )));
            }
            let pattern = RegexBuilder::new(source).case_insensitive(true).build()?;
            patterns.push(IntentPattern { intent, pattern });
        }
        Ok(Self { patterns })
    }

    /// Intents in the order they are tried for each token
    pub fn priority(&self) -> impl Iterator<Item = Intent> + '_ {
        self.patterns.iter().map(|p| p.intent)
    }

    /// Finds the first (token, intent) pair whose pattern matches.
    pub fn find<S: AsRef<str>>(&self, tokens: &[S]) -> Option<IntentMatch> {
        tokens.iter().find_map(|token| {
            let token = token.as_ref();
            self.patterns.iter().find_map(|p| {
                p.pattern.find(token).map(|m| IntentMatch {
                    intent: p.intent,
                    token: token.to_string(),
                    matched: m.as_str().to_string(),
                })
            })
        })
    }

    /// Like [`find`](Self::find) but only reports the intent
    pub fn match_intent<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Intent> {
        self.find(tokens).map(|m| m.intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> IntentMatcher {
        IntentMatcher::from_patterns(DEFAULT_PATTERNS).unwrap()
    }

    #[test]
    fn test_substring_search_within_token() {
        let m = matcher();
        assert_eq!(m.match_intent(&["classes"]), Some(Intent::Classes));
        assert_eq!(m.match_intent(&["prices"]), Some(Intent::Fees));
        assert_eq!(m.match_intent(&["trainers"]), Some(Intent::Instructor));
        assert_eq!(m.match_intent(&["emails"]), Some(Intent::Contact));
    }

    #[test]
    fn test_token_order_beats_intent_order() {
        let m = matcher();
        // "fee" comes first in the utterance, so it wins over the higher-priority "course"
        assert_eq!(m.match_intent(&["fee", "course"]), Some(Intent::Fees));
        assert_eq!(m.match_intent(&["course", "fee"]), Some(Intent::Classes));
    }

    #[test]
    fn test_intent_order_breaks_ties_within_token() {
        let m = matcher();
        // matches both classes ("class") and online ("remote") patterns
        let found = m.find(&["remoteclass"]).unwrap();
        assert_eq!(found.intent, Intent::Classes);
        assert_eq!(found.matched, "class");
    }

    #[test]
    fn test_multi_word_alternatives_never_match_single_token() {
        let m = matcher();
        assert_eq!(m.match_intent(&["online"]), None);
        assert_eq!(m.match_intent(&["batch"]), None);
    }

    #[test]
    fn test_case_insensitive() {
        let m = matcher();
        assert_eq!(m.match_intent(&["IELTS"]), Some(Intent::Ielts));
    }

    #[test]
    fn test_no_match() {
        let m = matcher();
        assert_eq!(m.match_intent(&["asdkjalksd"]), None);
        assert_eq!(m.match_intent::<&str>(&[]), None);
    }

    #[test]
    fn test_duplicate_intent_rejected() {
        let result = IntentMatcher::from_patterns([(Intent::Fees, "fee"), (Intent::Fees, "cost")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = IntentMatcher::from_patterns([(Intent::Fees, "(fee")]);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_priority_follows_declaration() {
        let m = IntentMatcher::from_patterns([(Intent::Location, "where"), (Intent::Fees, "fee")]).unwrap();
        let order: Vec<Intent> = m.priority().collect();
        assert_eq!(order, vec![Intent::Location, Intent::Fees]);
    }
}
