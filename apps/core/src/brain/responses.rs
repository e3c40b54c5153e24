//! Response table: intent → canned answer, plus the small-talk reply lists.

use super::intent::Intent;
use crate::error::AppError;
use crate::models::{FollowUps, KnowledgeBase, Templates};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How an entry is chosen from a reply list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStrategy {
    /// Always the first entry. Deterministic.
    #[default]
    First,
    /// Cycles through the list using the session's reply counter. Deterministic per session.
    RoundRobin,
    /// Uniformly random entry.
    Random,
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SelectionStrategy::First => "first",
            SelectionStrategy::RoundRobin => "round_robin",
            SelectionStrategy::Random => "random",
        };
        f.write_str(label)
    }
}

impl FromStr for SelectionStrategy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first" => Ok(SelectionStrategy::First),
            "round_robin" | "round-robin" => Ok(SelectionStrategy::RoundRobin),
            "random" => Ok(SelectionStrategy::Random),
            other => Err(AppError::Config(format!(
                "Unknown response selection '{}', expected first, round_robin or random",
                other
            ))),
        }
    }
}

/// Small-talk categories answered from a list rather than a single text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyList {
    Greeting,
    Farewell,
    HowAreYou,
    WhatsUp,
}

/// Immutable lookup tables built from a checked [`KnowledgeBase`].
pub struct ResponseTable {
    answers: HashMap<Intent, String>,
    greetings: Vec<String>,
    farewells: Vec<String>,
    how_are_you: Vec<String>,
    whats_up: Vec<String>,
    follow_ups: FollowUps,
    templates: Templates,
    fallback: String,
    welcome: String,
    strategy: SelectionStrategy,
}

impl ResponseTable {
    pub fn new(kb: &KnowledgeBase, strategy: SelectionStrategy) -> Result<Self, AppError> {
        kb.check()?;
        let answers = kb
            .intents
            .iter()
            .map(|entry| (entry.intent, entry.response.clone()))
            .collect();
        Ok(Self {
            answers,
            greetings: kb.greetings.clone(),
            farewells: kb.farewells.clone(),
            how_are_you: kb.how_are_you.clone(),
            whats_up: kb.whats_up.clone(),
            follow_ups: kb.follow_ups.clone(),
            templates: kb.templates.clone(),
            fallback: kb.fallback.clone(),
            welcome: kb.welcome.clone(),
            strategy,
        })
    }

    /// The canned answer for an intent.
    pub fn response_for(&self, intent: Intent) -> &str {
        // Construction went through KnowledgeBase::check, so every intent is present.
        self.answers.get(&intent).map(String::as_str).unwrap_or(&self.fallback)
    }

    /// Picks from a reply list. `cursor` is the session's reply counter and is
    /// only consulted by [`SelectionStrategy::RoundRobin`].
    pub fn pick(&self, list: ReplyList, cursor: usize) -> &str {
        let entries = match list {
            ReplyList::Greeting => &self.greetings,
            ReplyList::Farewell => &self.farewells,
            ReplyList::HowAreYou => &self.how_are_you,
            ReplyList::WhatsUp => &self.whats_up,
        };
        let chosen = match self.strategy {
            SelectionStrategy::First => entries.first(),
            SelectionStrategy::RoundRobin => entries.get(cursor % entries.len().max(1)),
            SelectionStrategy::Random => entries.choose(&mut rand::thread_rng()),
        };
        chosen.map(String::as_str).unwrap_or(&self.fallback)
    }

    pub fn follow_ups(&self) -> &FollowUps {
        &self.follow_ups
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn welcome(&self) -> &str {
        &self.welcome
    }
}
