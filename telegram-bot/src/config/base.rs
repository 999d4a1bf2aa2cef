//! Base config: Telegram connection and logging. Loaded from env or any key lookup.

use std::env;

use crate::core::{BotError, Result};

pub const DEFAULT_LOG_FILE: &str = "logs/persona-bot.log";

/// Base config: Telegram-related and logging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Log file path
    pub log_file: String,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        Self::from_lookup(token, |key| env::var(key).ok())
    }

    /// Builds from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(token: Option<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_token = token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| get("BOT_TOKEN"))
            .ok_or_else(|| BotError::config("BOT_TOKEN not set"))?;
        let telegram_api_url = get("TELEGRAM_API_URL").or_else(|| get("TELOXIDE_API_URL"));
        let log_file = get("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

        let config = Self {
            bot_token: bot_token.trim().to_string(),
            telegram_api_url,
            log_file,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate config (telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                return Err(BotError::config(format!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                )));
            }
        }
        Ok(())
    }
}
