//! # Telegram bot framework
//!
//! Transport-agnostic core (Handler, Bot, Message), the handler chain, base config, logging,
//! the teloxide transport (adapter + REPL runner), framework handlers and chat history stores.
//! Applications plug their own [`Handler`] into a [`HandlerChain`] and hand it to [`run_repl`].

pub mod chain;
pub mod config;
pub mod core;
pub mod handlers;
pub mod history;
pub mod telegram;

pub use core::{
    init_tracing, Bot, BotError, Chat, Handler, HandlerError, HandlerResponse, Message, Result,
    ToCoreMessage, ToCoreUser, User,
};

pub use chain::HandlerChain;
pub use config::BaseConfig;
pub use handlers::{AllowListHandler, LoggingHandler};
pub use history::{ChatHistoryStore, InMemoryHistoryStore, SqliteHistoryStore};
pub use telegram::{
    build_teloxide_bot, run_repl, TelegramBotAdapter, TelegramMessageWrapper, TelegramUserWrapper,
};
