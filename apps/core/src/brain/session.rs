//! Per-conversation state.
//!
//! A session is either idle or on a topic (the last intent answered), and may
//! know the user's name. Only the `classes` topic has contextual follow-ups:
//! a later "fees"/"cost" or "schedule"/"time" is answered from the follow-up
//! texts without leaving the topic. No other topic gets this shortcut.

use super::intent::Intent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FEES_TRIGGERS: [&str; 2] = ["fees", "cost"];
const SCHEDULE_TRIGGERS: [&str; 2] = ["schedule", "time"];

/// Contextual follow-up resolved against the current topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUp {
    Fees,
    Schedule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub conversation_id: String,
    last_topic: Option<Intent>,
    known_name: Option<String>,
    /// Replies produced so far; drives round-robin selection
    replies: usize,
    pub started_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: conversation_id.into(),
            last_topic: None,
            known_name: None,
            replies: 0,
            started_at: now,
            last_active: now,
        }
    }

    /// `None` means idle
    pub fn last_topic(&self) -> Option<Intent> {
        self.last_topic
    }

    pub fn known_name(&self) -> Option<&str> {
        self.known_name.as_deref()
    }

    pub fn replies(&self) -> usize {
        self.replies
    }

    /// Stores the name unless one is already known. Returns whether it was stored.
    pub fn bind_name(&mut self, name: &str) -> bool {
        if self.known_name.is_some() {
            return false;
        }
        self.known_name = Some(name.to_string());
        true
    }

    pub fn enter_topic(&mut self, intent: Intent) {
        self.last_topic = Some(intent);
    }

    pub fn go_idle(&mut self) {
        self.last_topic = None;
    }

    /// Follow-up shortcut for the current topic, if any. Tokens are compared
    /// for equality, so "fee" or "costs" do not trigger it.
    pub fn follow_up<S: AsRef<str>>(&self, tokens: &[S]) -> Option<FollowUp> {
        if self.last_topic != Some(Intent::Classes) {
            return None;
        }
        let has = |triggers: &[&str]| {
            tokens
                .iter()
                .any(|t| triggers.iter().any(|trigger| *trigger == t.as_ref()))
        };
        if has(&FEES_TRIGGERS[..]) {
            Some(FollowUp::Fees)
        } else if has(&SCHEDULE_TRIGGERS[..]) {
            Some(FollowUp::Schedule)
        } else {
            None
        }
    }

    /// Returns the reply counter before this reply and advances it.
    pub(crate) fn next_cursor(&mut self) -> usize {
        let cursor = self.replies;
        self.replies += 1;
        self.last_active = Utc::now();
        cursor
    }
}
