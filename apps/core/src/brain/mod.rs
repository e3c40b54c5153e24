//! # Brain Module
//!
//! Rule-based enquiry engine. Classifies a user message against keyword
//! patterns and returns a canned answer, tracking a topic and a name per
//! conversation.
//!
//! ## Components
//! - `tokenizer`: lower-casing, word splitting, stop-word filtering
//! - `names`: person-name extraction (pluggable)
//! - `intent`: ordered per-token regex matching
//! - `responses`: intent answers and small-talk reply lists
//! - `session`: per-conversation topic/name state and follow-ups
//! - `dialogue`: the priority cascade tying it together

pub mod dialogue;
pub mod intent;
pub mod names;
pub mod responses;
pub mod session;
pub mod tokenizer;

pub use dialogue::{Reply, Responder, Route};
pub use intent::{Intent, IntentMatch, IntentMatcher};
pub use names::{NameExtractor, NoNames, RuleBasedNameExtractor};
pub use responses::{ReplyList, ResponseTable, SelectionStrategy};
pub use session::{FollowUp, Session};
pub use tokenizer::Tokenizer;
