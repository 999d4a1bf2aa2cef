//! Deployment config: environment (or any key/value source) → [`PersonaBotConfig`].
//!
//! Built once at startup, validated, then shared read-only behind an `Arc`.

use std::collections::HashMap;
use std::env;

use telegram_bot::{BaseConfig, BotError, Result};

use crate::persona::Persona;
use crate::tools::ToolKind;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_SQLITE_PATH: &str = "./data/history.db";
pub const DEFAULT_TOOLS: &str = "search,selfie";

/// Backing store for the conversation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryStoreType {
    Memory,
    Sqlite,
}

impl MemoryStoreType {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(BotError::config(format!(
                "MEMORY_STORE_TYPE must be 'memory' or 'sqlite', got '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySettings {
    pub store_type: MemoryStoreType,
    pub sqlite_path: String,
}

/// Typed deployment parameters. Same input always yields an equal value.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaBotConfig {
    pub base: BaseConfig,
    pub elevenlabs_api_key: String,
    pub elevenlabs_voice_id: String,
    /// Allowed chat ids; empty means no restriction.
    pub chat_ids: Vec<i64>,
    pub persona: Persona,
    pub use_gpt4: bool,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub serpapi_api_key: String,
    pub tools: Vec<ToolKind>,
    pub llm_cache: bool,
    pub instance_handle: Option<String>,
    pub memory: MemorySettings,
}

impl PersonaBotConfig {
    /// Loads from the process environment. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let token = token.filter(|t| !t.trim().is_empty());
        Self::from_lookup(|key| match (key, &token) {
            ("BOT_TOKEN", Some(t)) => Some(t.clone()),
            _ => env::var(key).ok(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    pub fn from_map(values: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| values.get(key).cloned())
    }

    /// Parses and validates every recognized key. `lookup` returns `None` for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = BaseConfig::from_lookup(None, &lookup)?;
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).unwrap_or_default();

        let personality = lookup("PERSONALITY")
            .ok_or_else(|| BotError::config("PERSONALITY not set"))?;
        let persona = Persona::from_config_value(&personality)?;

        // Absent selects the defaults; present but empty disables every tool.
        let tools_raw = lookup("TOOLS").unwrap_or_else(|| DEFAULT_TOOLS.to_string());

        let config = Self {
            base,
            elevenlabs_api_key: text("ELEVENLABS_API_KEY"),
            elevenlabs_voice_id: text("ELEVENLABS_VOICE_ID"),
            chat_ids: parse_chat_ids(&text("CHAT_IDS"))?,
            persona,
            use_gpt4: parse_bool("USE_GPT4", lookup("USE_GPT4"), true)?,
            openai_api_key: text("OPENAI_API_KEY"),
            openai_base_url: Some(text("OPENAI_BASE_URL"))
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            serpapi_api_key: text("SERPAPI_API_KEY"),
            tools: ToolKind::parse_list(&tools_raw)?,
            llm_cache: parse_bool("LLM_CACHE", lookup("LLM_CACHE"), false)?,
            instance_handle: Some(text("INSTANCE_HANDLE")).filter(|v| !v.is_empty()),
            memory: MemorySettings {
                store_type: MemoryStoreType::parse(&text("MEMORY_STORE_TYPE"))?,
                sqlite_path: Some(text("MEMORY_SQLITE_PATH"))
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| DEFAULT_SQLITE_PATH.to_string()),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks. Called by [`PersonaBotConfig::from_lookup`].
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if reqwest::Url::parse(&self.openai_base_url).is_err() {
            return Err(BotError::config(format!(
                "OPENAI_BASE_URL is not a valid URL: {}",
                self.openai_base_url
            )));
        }
        if !self.elevenlabs_api_key.is_empty() && self.elevenlabs_voice_id.is_empty() {
            return Err(BotError::config(
                "ELEVENLABS_API_KEY is set but ELEVENLABS_VOICE_ID is empty",
            ));
        }
        Ok(())
    }

    /// Fails unless an OpenAI key is present. Checked before serving traffic.
    pub fn require_openai_key(&self) -> Result<()> {
        if self.openai_api_key.is_empty() {
            return Err(BotError::config("OPENAI_API_KEY not set"));
        }
        Ok(())
    }

    /// Chat model name for the configured tier.
    pub fn model_name(&self) -> &'static str {
        if self.use_gpt4 {
            "gpt-4"
        } else {
            "gpt-3.5-turbo"
        }
    }

    /// True when both voice credentials are present.
    pub fn has_voice(&self) -> bool {
        !self.elevenlabs_api_key.is_empty() && !self.elevenlabs_voice_id.is_empty()
    }
}

fn parse_chat_ids(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| BotError::config(format!("CHAT_IDS entry is not an integer: '{}'", s)))
        })
        .collect()
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(BotError::config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}
