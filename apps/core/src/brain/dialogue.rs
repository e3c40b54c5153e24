//! Dialogue controller.
//!
//! `respond` runs a strict priority cascade and returns on the first branch
//! that applies:
//! 1. exit phrase anywhere in the text → farewell
//! 2. "how are you" / "what's up" → small-talk reply
//! 3. a word equal to a greeting word → greeting
//! 4. a person name → remember it, acknowledge
//! 5. contextual follow-up on the current topic
//! 6. intent match on the content tokens → canned answer, topic updated
//! 7. fallback, topic cleared
//!
//! Every branch produces text. Nothing the user types is an error.

use super::intent::{Intent, IntentMatcher};
use super::names::{NameExtractor, RuleBasedNameExtractor};
use super::responses::{ReplyList, ResponseTable, SelectionStrategy};
use super::session::{FollowUp, Session};
use super::tokenizer::Tokenizer;
use crate::error::AppError;
use crate::models::{personalise, KnowledgeBase};
use serde::{Deserialize, Serialize};
use tracing::debug;

const HOW_ARE_YOU: &str = "how are you";
const WHATS_UP: &str = "what's up";

/// Which branch of the cascade produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "route", content = "detail")]
pub enum Route {
    Exit,
    HowAreYou,
    WhatsUp,
    Greeting,
    NameIntroduced,
    FollowUp(FollowUp),
    Answer(Intent),
    Fallback,
}

/// Reply text plus the route that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub route: Route,
}

impl Reply {
    fn new(text: impl Into<String>, route: Route) -> Self {
        Self {
            text: text.into(),
            route,
        }
    }
}

/// The classification-and-response engine. Holds no conversation state;
/// callers pass the [`Session`] for the conversation being answered.
pub struct Responder {
    tokenizer: Tokenizer,
    matcher: IntentMatcher,
    table: ResponseTable,
    names: Box<dyn NameExtractor>,
    greeting_words: Vec<String>,
    exit_phrases: Vec<String>,
}

impl Responder {
    /// Builds a responder from a knowledge base with the rule-based name
    /// extractor, guarded by the same intent table.
    pub fn new(kb: &KnowledgeBase, strategy: SelectionStrategy) -> Result<Self, AppError> {
        let table = ResponseTable::new(kb, strategy)?;
        let matcher = IntentMatcher::from_patterns(
            kb.intents
                .iter()
                .map(|entry| (entry.intent, entry.pattern.as_str())),
        )?;
        let names = RuleBasedNameExtractor::new().with_topic_guard(matcher.clone());
        Ok(Self {
            tokenizer: Tokenizer::new(),
            matcher,
            table,
            names: Box::new(names),
            greeting_words: kb.greeting_words.iter().map(|w| w.to_lowercase()).collect(),
            exit_phrases: kb.exit_phrases.iter().map(|p| p.to_lowercase()).collect(),
        })
    }

    /// Built-in knowledge base, first-choice replies.
    pub fn with_defaults() -> Result<Self, AppError> {
        Self::new(&KnowledgeBase::default(), SelectionStrategy::First)
    }

    /// Replaces the name extractor.
    pub fn with_name_extractor(mut self, names: impl NameExtractor) -> Self {
        self.names = Box::new(names);
        self
    }

    pub fn welcome(&self) -> &str {
        self.table.welcome()
    }

    /// Convenience wrapper returning only the text.
    pub fn respond_text(&self, session: &mut Session, utterance: &str) -> String {
        self.respond(session, utterance).text
    }

    pub fn respond(&self, session: &mut Session, utterance: &str) -> Reply {
        let cursor = session.next_cursor();
        let reply = self.cascade(session, utterance, cursor);
        debug!(
            conversation = %session.conversation_id,
            route = ?reply.route,
            topic = ?session.last_topic(),
            "Reply selected"
        );
        reply
    }

    fn cascade(&self, session: &mut Session, utterance: &str, cursor: usize) -> Reply {
        let lower = utterance.to_lowercase();
        let templates = self.table.templates();

        if self.exit_phrases.iter().any(|p| lower.contains(p.as_str())) {
            return Reply::new(self.table.pick(ReplyList::Farewell, cursor), Route::Exit);
        }

        if lower.contains(HOW_ARE_YOU) {
            let text = match session.known_name() {
                Some(name) => personalise(&templates.how_are_you_named, name),
                None => self.table.pick(ReplyList::HowAreYou, cursor).to_string(),
            };
            return Reply::new(text, Route::HowAreYou);
        }
        if lower.contains(WHATS_UP) {
            return Reply::new(self.table.pick(ReplyList::WhatsUp, cursor), Route::WhatsUp);
        }

        if self.is_greeting(&lower) {
            let text = match session.known_name() {
                Some(name) => personalise(&templates.returning_greeting, name),
                None => format!(
                    "{} {}",
                    self.table.pick(ReplyList::Greeting, cursor),
                    templates.greeting_prompt
                ),
            };
            return Reply::new(text, Route::Greeting);
        }

        if let Some(name) = self.names.extract_person_name(utterance) {
            if !session.bind_name(&name) {
                debug!(conversation = %session.conversation_id, "Name already known, keeping first");
            }
            return Reply::new(
                personalise(&templates.name_acknowledgement, &name),
                Route::NameIntroduced,
            );
        }

        let tokens = self.tokenizer.normalize(utterance);

        if let Some(follow_up) = session.follow_up(&tokens) {
            let follow_ups = self.table.follow_ups();
            let text = match follow_up {
                FollowUp::Fees => &follow_ups.fees,
                FollowUp::Schedule => &follow_ups.schedule,
            };
            return Reply::new(text.as_str(), Route::FollowUp(follow_up));
        }

        if let Some(found) = self.matcher.find(&tokens) {
            debug!(intent = %found.intent, token = %found.token, "Intent matched");
            session.enter_topic(found.intent);
            return Reply::new(self.table.response_for(found.intent), Route::Answer(found.intent));
        }

        session.go_idle();
        Reply::new(self.table.fallback(), Route::Fallback)
    }

    /// Whitespace-delimited words compared whole; "hi!" is not "hi".
    fn is_greeting(&self, lower: &str) -> bool {
        lower
            .split_whitespace()
            .any(|word| self.greeting_words.iter().any(|g| g == word))
    }
}
