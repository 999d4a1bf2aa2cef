//! **Public API of this crate.** Entry points used by the binary and by integration tests.

use std::sync::Arc;

use anyhow::Result;
use telegram_bot::{build_teloxide_bot, init_tracing, run_repl, Bot, HandlerChain, TelegramBotAdapter};
use tracing::info;

use crate::agent::{AgentFactory, AgentReply};
use crate::assembly;
use crate::config::PersonaBotConfig;

/// Runs the Telegram bot until the process is stopped. Load config with [`PersonaBotConfig::load`] first.
pub async fn run_bot(config: PersonaBotConfig) -> Result<()> {
    init_tracing(&config.base.log_file)?;
    config.require_openai_key()?;
    info!(
        persona = %config.persona,
        model = config.model_name(),
        tools = ?config.tools,
        "Starting persona bot"
    );

    let teloxide_bot = build_teloxide_bot(&config.base)?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let chain = build_handler_chain(config, bot).await?;

    run_repl(teloxide_bot, chain).await?;
    Ok(())
}

/// Builds the full handler chain around `bot` without starting the REPL (mock bots in tests).
pub async fn build_handler_chain(config: PersonaBotConfig, bot: Arc<dyn Bot>) -> Result<HandlerChain> {
    let factory = assembly::build_agent_factory(Arc::new(config)).await?;
    Ok(assembly::build_handler_chain(factory, bot))
}

/// Handler chain over an already-built factory (custom model or executor).
pub fn build_handler_chain_with_factory(factory: AgentFactory, bot: Arc<dyn Bot>) -> HandlerChain {
    assembly::build_handler_chain(factory, bot)
}

/// One agent turn without Telegram. Memory is used as configured.
pub async fn run_local_turn(config: PersonaBotConfig, chat_id: &str, input: &str) -> Result<AgentReply> {
    config.require_openai_key()?;
    let factory = assembly::build_agent_factory(Arc::new(config)).await?;
    let reply = factory.build_agent(chat_id)?.run(input).await?;
    Ok(reply)
}
