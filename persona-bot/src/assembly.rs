//! Assembly: history store, agent factory and handler chain. Used by the [facade](crate::facade).

use std::sync::Arc;

use telegram_bot::{AllowListHandler, Bot, HandlerChain, LoggingHandler, Result};
use tracing::info;

use crate::agent::AgentFactory;
use crate::config::PersonaBotConfig;
use crate::handler::AgentHandler;
use crate::memory::create_history_store;

/// History store plus the OpenAI-backed agent factory.
pub(crate) async fn build_agent_factory(config: Arc<PersonaBotConfig>) -> Result<AgentFactory> {
    let history = create_history_store(&config).await?;
    Ok(AgentFactory::new(config, history))
}

/// Logging → allow-list → agent.
pub(crate) fn build_handler_chain(factory: AgentFactory, bot: Arc<dyn Bot>) -> HandlerChain {
    let allowed = factory.config().chat_ids.clone();
    if allowed.is_empty() {
        info!("CHAT_IDS empty; accepting messages from every chat");
    } else {
        info!(chats = allowed.len(), "Restricting bot to CHAT_IDS");
    }
    let agent_handler = AgentHandler::new(factory, bot);
    info!(voice = agent_handler.has_voice(), "Agent handler ready");

    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(AllowListHandler::new(allowed)))
        .add_handler(Arc::new(agent_handler))
}
