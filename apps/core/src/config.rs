//! Runtime settings read from the environment (and an optional `.env` file).
//!
//! | Variable                    | Default  |
//! |-----------------------------|----------|
//! | `FAQBOT_KNOWLEDGE_PATH`     | built-in |
//! | `FAQBOT_SESSION_CAPACITY`   | 1024     |
//! | `FAQBOT_RESPONSE_SELECTION` | first    |
//! | `FAQBOT_LOG_FORMAT`         | pretty   |
//! | `FAQBOT_REPLY_TIMEOUT_SECS` | 5        |

use crate::brain::SelectionStrategy;
use crate::error::AppError;
use crate::models::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use validator::Validate;

pub const ENV_KNOWLEDGE_PATH: &str = "FAQBOT_KNOWLEDGE_PATH";
pub const ENV_SESSION_CAPACITY: &str = "FAQBOT_SESSION_CAPACITY";
pub const ENV_RESPONSE_SELECTION: &str = "FAQBOT_RESPONSE_SELECTION";
pub const ENV_LOG_FORMAT: &str = "FAQBOT_LOG_FORMAT";
pub const ENV_REPLY_TIMEOUT_SECS: &str = "FAQBOT_REPLY_TIMEOUT_SECS";

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Bunyan,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "bunyan" => Ok(LogFormat::Bunyan),
            other => Err(AppError::Config(format!(
                "Unknown log format '{}', expected pretty, json or bunyan",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Settings {
    /// JSON knowledge base replacing the built-in content
    pub knowledge_path: Option<PathBuf>,
    /// Conversations kept in memory before the least recently active is dropped
    #[validate(range(min = 1, max = 100_000))]
    pub session_capacity: usize,
    pub response_selection: SelectionStrategy,
    pub log_format: LogFormat,
    #[validate(range(min = 1, max = 300))]
    pub reply_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            knowledge_path: None,
            session_capacity: 1024,
            response_selection: SelectionStrategy::First,
            log_format: LogFormat::Pretty,
            reply_timeout_secs: 5,
        }
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the environment.
    pub fn load() -> Result<Self, AppError> {
        // A missing .env is normal
        let _ = dotenv::dotenv();
        Self::from_env()
    }

    /// Reads settings from the process environment only.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();
        let settings = Self {
            knowledge_path: env_var(ENV_KNOWLEDGE_PATH).map(PathBuf::from),
            session_capacity: parse_var(ENV_SESSION_CAPACITY)?.unwrap_or(defaults.session_capacity),
            response_selection: parse_var(ENV_RESPONSE_SELECTION)?
                .unwrap_or(defaults.response_selection),
            log_format: parse_var(ENV_LOG_FORMAT)?.unwrap_or(defaults.log_format),
            reply_timeout_secs: parse_var(ENV_REPLY_TIMEOUT_SECS)?
                .unwrap_or(defaults.reply_timeout_secs),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn reply_timeout(&self) -> Duration {
        Duration::from_secs(self.reply_timeout_secs)
    }

    /// The configured knowledge base, or the built-in one.
    pub fn knowledge_base(&self) -> Result<KnowledgeBase, AppError> {
        match &self.knowledge_path {
            Some(path) => {
                let kb = KnowledgeBase::from_path(path)?;
                info!("Loaded knowledge base from {}", path.display());
                Ok(kb)
            }
            None => Ok(KnowledgeBase::default()),
        }
    }
}

/// Non-blank value of an environment variable
fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| AppError::Config(format!("{}='{}': {}", key, raw, e)))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" bunyan ".parse::<LogFormat>().unwrap(), LogFormat::Bunyan);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.reply_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        let settings = Settings {
            session_capacity: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }
}
