//! Error types for the bot.
//!
//! [`BotError`] is the top-level error; [`HandlerError`] is used for handler failures.
//! Startup failures (`ConfigValidation`, `UnknownPersona`) end the process; runtime failures
//! (`ToolInvocation`, `Llm`, `Transport`, `Memory`) are surfaced unchanged, never retried.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Unknown persona: {0}")]
    UnknownPersona(String),

    #[error("Tool '{tool}' failed: {message}")]
    ToolInvocation { tool: String, message: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Memory error: {0}")]
    Memory(String),

    #[error("Handler error: {0}")]
    Handler(#[from] HandlerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn config(message: impl Into<String>) -> Self {
        BotError::ConfigValidation(message.into())
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        BotError::ToolInvocation {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Errors produced by handlers.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Unauthorized chat: {0}")]
    Unauthorized(i64),
}

impl From<sqlx::Error> for BotError {
    fn from(e: sqlx::Error) -> Self {
        BotError::Memory(e.to_string())
    }
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
