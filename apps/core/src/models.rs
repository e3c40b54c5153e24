//! Knowledge base: every piece of text the responder can say, and the patterns
//! that select it.
//!
//! The built-in [`Default`] carries the Englishfirm enquiry content. A JSON file
//! with the same shape can replace it (see [`crate::config`]). Intents are
//! required in such a file; every other section falls back to the built-in
//! text when omitted.

use crate::brain::intent::{Intent, DEFAULT_PATTERNS};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use validator::Validate;

/// Placeholder substituted with the user's name in templates.
pub const NAME_PLACEHOLDER: &str = "{name}";

const WEBSITE: &str = "https://englishfirm.com/";

/// One row of the intent table: the pattern that selects a topic and its answer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct IntentEntry {
    pub intent: Intent,
    /// Case-insensitive regex searched inside a single token.
    #[validate(length(min = 1))]
    pub pattern: String,
    #[validate(length(min = 1))]
    pub response: String,
}

/// Answers given while the conversation topic is `classes`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct FollowUps {
    /// Triggered by the tokens "fees" or "cost"
    #[validate(length(min = 1))]
    pub fees: String,
    /// Triggered by the tokens "schedule" or "time"
    #[validate(length(min = 1))]
    pub schedule: String,
}

/// Personalised replies. Each must contain `{name}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Templates {
    /// Appended to the first greeting when no name is known
    #[validate(length(min = 1))]
    pub greeting_prompt: String,
    #[validate(length(min = 1))]
    pub returning_greeting: String,
    #[validate(length(min = 1))]
    pub how_are_you_named: String,
    #[validate(length(min = 1))]
    pub name_acknowledgement: String,
}

/// Complete responder content.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct KnowledgeBase {
    /// Ordered intent table; order is matching priority.
    #[validate(length(min = 1))]
    #[validate(nested)]
    pub intents: Vec<IntentEntry>,
    /// Words that, standing alone in the utterance, make it a greeting
    #[serde(default = "defaults::greeting_words")]
    #[validate(length(min = 1))]
    pub greeting_words: Vec<String>,
    /// Substrings that end the conversation
    #[serde(default = "defaults::exit_phrases")]
    #[validate(length(min = 1))]
    pub exit_phrases: Vec<String>,
    #[serde(default = "defaults::greetings")]
    #[validate(length(min = 1))]
    pub greetings: Vec<String>,
    #[serde(default = "defaults::farewells")]
    #[validate(length(min = 1))]
    pub farewells: Vec<String>,
    #[serde(default = "defaults::how_are_you")]
    #[validate(length(min = 1))]
    pub how_are_you: Vec<String>,
    #[serde(default = "defaults::whats_up")]
    #[validate(length(min = 1))]
    pub whats_up: Vec<String>,
    #[serde(default = "defaults::follow_ups")]
    #[validate(nested)]
    pub follow_ups: FollowUps,
    #[serde(default = "defaults::templates")]
    #[validate(nested)]
    pub templates: Templates,
    #[serde(default = "defaults::fallback")]
    #[validate(length(min = 1))]
    pub fallback: String,
    /// Sent when a conversation starts
    #[serde(default = "defaults::welcome")]
    #[validate(length(min = 1))]
    pub welcome: String,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self {
            intents: defaults::intents(),
            greeting_words: defaults::greeting_words(),
            exit_phrases: defaults::exit_phrases(),
            greetings: defaults::greetings(),
            farewells: defaults::farewells(),
            how_are_you: defaults::how_are_you(),
            whats_up: defaults::whats_up(),
            follow_ups: defaults::follow_ups(),
            templates: defaults::templates(),
            fallback: defaults::fallback(),
            welcome: defaults::welcome(),
        }
    }
}

impl KnowledgeBase {
    /// Parses and validates a JSON knowledge base.
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let kb: KnowledgeBase = serde_json::from_str(json)?;
        kb.check()?;
        Ok(kb)
    }

    /// Reads, parses and validates a JSON knowledge base file.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Cannot read knowledge base {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Field validation plus the table invariants: every intent of the closed
    /// set has exactly one entry, no text is blank and every template can be
    /// personalised.
    pub fn check(&self) -> Result<(), AppError> {
        self.validate()?;

        let mut seen = HashSet::new();
        for entry in &self.intents {
            if !seen.insert(entry.intent) {
                return Err(AppError::Config(format!(
                    "Intent '{}' declared more than once",
                    entry.intent
                )));
            }
            if entry.response.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "Intent '{}' has a blank response",
                    entry.intent
                )));
            }
        }
        let missing: Vec<&str> = Intent::ALL
            .iter()
            .filter(|intent| !seen.contains(*intent))
            .map(|intent| intent.label())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Intents without a response: {}",
                missing.join(", ")
            )));
        }

        let lists = [
            ("greeting_words", &self.greeting_words),
            ("exit_phrases", &self.exit_phrases),
            ("greetings", &self.greetings),
            ("farewells", &self.farewells),
            ("how_are_you", &self.how_are_you),
            ("whats_up", &self.whats_up),
        ];
        for (name, list) in lists {
            if list.iter().any(|s| s.trim().is_empty()) {
                return Err(AppError::Config(format!("'{}' contains a blank entry", name)));
            }
        }

        let templates = [
            ("returning_greeting", &self.templates.returning_greeting),
            ("how_are_you_named", &self.templates.how_are_you_named),
            ("name_acknowledgement", &self.templates.name_acknowledgement),
        ];
        for (name, template) in templates {
            if !template.contains(NAME_PLACEHOLDER) {
                return Err(AppError::Config(format!(
                    "Template '{}' must contain {}",
                    name, NAME_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }
}

/// Fills `{name}` in a template.
pub fn personalise(template: &str, name: &str) -> String {
    template.replace(NAME_PLACEHOLDER, name)
}

mod defaults {
    use super::*;

    fn response_for(intent: Intent) -> String {
        match intent {
            Intent::Classes => format!(
                "We offer IELTS, PTE, General English, and Business English classes. Englishfirm offers PTE, IELTS, NAATI, and General English coaching. They provide one-on-one sessions, and both online and in-person options in Sydney, Melbourne, and Kochi. There are two-week crash courses and unlimited practice sessions available for PTE. Classes can be booked through the website, with flexible timing options :  {}",
                WEBSITE
            ),
            Intent::Ielts => "Yes, we provide expert IELTS coaching with certified trainers to help you achieve your desired band score.".to_string(),
            Intent::Fees => fees_text(),
            Intent::Schedule => format!(
                "Our next IELTS batch starts on the 1st of the upcoming month. You can register online or call us for more details. Classes run seven days a week, with branches in Sydney and Melbourne, plus flexible online classes for remote students. You can also book classes year-round :  {}",
                WEBSITE
            ),
            Intent::Contact => "You can contact us at +61 2 8006 2063 or info@englishfirm.com for further inquiries.".to_string(),
            Intent::Online => "Yes, we offer online classes so you can learn from the comfort of your home.".to_string(),
            Intent::Location => format!(
                "Englishfirm has centers across Australia, including Sydney and Melbourne. We have branches in Parramatta (Sydney), Melbourne, and Kochi, Kerala. Online classes are available for students in other parts of Australia and internationally. Check our website for the nearest location to you:  {}",
                WEBSITE
            ),
            Intent::Instructor => "Our instructors are experienced and certified IELTS and PTE trainers. Trainers at Englishfirm, such as Avanti and Vandana, are experienced in coaching for PTE and IELTS with personalized attention. They emphasize individual growth, mentoring students to help them achieve their language goals.".to_string(),
        }
    }

    fn fees_text() -> String {
        format!(
            "The fees for IELTS coaching vary based on the course duration and mode of learning. You can book a free 30-minute demo session with access to mock tests and practice materials before committing to a paid course. Fees for extended courses vary depending on the duration and type (e.g., crash courses, unlimited classes), but specific pricing details should be confirmed via our contact numbers. Please contact us for detailed pricing information : {}",
            WEBSITE
        )
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    pub fn intents() -> Vec<IntentEntry> {
        DEFAULT_PATTERNS
            .iter()
            .map(|(intent, pattern)| IntentEntry {
                intent: *intent,
                pattern: pattern.to_string(),
                response: response_for(*intent),
            })
            .collect()
    }

    pub fn greeting_words() -> Vec<String> {
        // Multi-word entries never equal a single word; kept for parity with the greeting list.
        strings(&[
            "hi",
            "hey",
            "hello",
            "howdy",
            "how are you",
            "good morning",
            "good afternoon",
            "good evening",
            "what's up",
        ])
    }

    pub fn exit_phrases() -> Vec<String> {
        strings(&["quit", "pause", "exit", "goodbye", "bye", "later"])
    }

    pub fn greetings() -> Vec<String> {
        strings(&[
            "Hello! How can I assist you today?",
            "Hi there! What can I help you with?",
            "Hey! How's it going?",
            "Good morning! How can I help you today?",
            "Good afternoon! What can I assist you with?",
        ])
    }

    pub fn farewells() -> Vec<String> {
        strings(&[
            "Goodbye! Have a great day!",
            "Bye! Feel free to reach out anytime.",
            "Take care!",
        ])
    }

    pub fn how_are_you() -> Vec<String> {
        strings(&[
            "I'm doing great! Thanks for asking.",
            "I'm just a bot, but I'm here to help you!",
            "I'm good! How about you?",
            "I'm always ready to assist you with any questions you have.",
        ])
    }

    pub fn whats_up() -> Vec<String> {
        strings(&[
            "Not much, just here to help you out!",
            "Nothing much, what's up with you?",
            "I'm here to assist you with any queries you have.",
        ])
    }

    pub fn follow_ups() -> FollowUps {
        FollowUps {
            fees: fees_text(),
            schedule: "Our next IELTS batch starts on the 1st of the upcoming month.".to_string(),
        }
    }

    pub fn templates() -> Templates {
        Templates {
            greeting_prompt: "What can I help you with?".to_string(),
            returning_greeting: "Hello again, {name}! How can I assist you?".to_string(),
            how_are_you_named: "I'm good, {name}! How about you?".to_string(),
            name_acknowledgement: "Nice to meet you, {name}! How can I assist you today?".to_string(),
        }
    }

    pub fn fallback() -> String {
        "I'm sorry, I don't have the information you're looking for. I'm here to assist you with any queries you have.".to_string()
    }

    pub fn welcome() -> String {
        "Welcome to Englishfirm chatbot! I'm here to assist you with any queries you have.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        KnowledgeBase::default().check().unwrap();
    }

    #[test]
    fn test_default_intent_order() {
        let kb = KnowledgeBase::default();
        let order: Vec<Intent> = kb.intents.iter().map(|e| e.intent).collect();
        assert_eq!(order, Intent::ALL.to_vec());
    }

    #[test]
    fn test_missing_intent_is_fatal() {
        let mut kb = KnowledgeBase::default();
        kb.intents.retain(|e| e.intent != Intent::Contact);
        let err = kb.check().unwrap_err();
        assert!(matches!(err, AppError::Config(ref m) if m.contains("contact")));
    }

    #[test]
    fn test_duplicate_intent_is_fatal() {
        let mut kb = KnowledgeBase::default();
        let dup = kb.intents[0].clone();
        kb.intents.push(dup);
        assert!(matches!(kb.check(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_blank_response_is_fatal() {
        let mut kb = KnowledgeBase::default();
        kb.intents[2].response = "   ".to_string();
        assert!(matches!(kb.check(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_empty_response_fails_validation() {
        let mut kb = KnowledgeBase::default();
        kb.intents[2].response.clear();
        assert!(matches!(kb.check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_template_without_placeholder_is_fatal() {
        let mut kb = KnowledgeBase::default();
        kb.templates.returning_greeting = "Hello again!".to_string();
        assert!(matches!(kb.check(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_json_with_only_intents_uses_default_text() {
        let kb = KnowledgeBase::default();
        let json = serde_json::json!({ "intents": kb.intents }).to_string();
        let loaded = KnowledgeBase::from_json_str(&json).unwrap();
        assert_eq!(loaded, kb);
    }

    #[test]
    fn test_unknown_intent_label_rejected() {
        let json = r#"{ "intents": [ { "intent": "visa", "pattern": "visa", "response": "No." } ] }"#;
        assert!(matches!(KnowledgeBase::from_json_str(json), Err(AppError::Config(_))));
    }

    #[test]
    fn test_personalise() {
        assert_eq!(personalise("Hello again, {name}!", "Priya"), "Hello again, Priya!");
    }
}
