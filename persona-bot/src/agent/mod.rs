//! Agent: one chat turn through the model, tools and memory.
//!
//! [`AgentFactory::build_agent`] assembles a single-use [`Agent`] per turn; [`Agent::run`] loads the
//! memory window, drives the [`AgentExecutor`] and saves the exchange.

mod executor;
mod factory;

use std::sync::Arc;

use async_trait::async_trait;
use openai_client::{AgentMessage, ModelSettings, ModelTurn, OpenAIClient, ToolDefinition};
use prompt::{ChatMessage, MessageRole};
use telegram_bot::Result;
use tracing::{info, instrument};

use crate::memory::WindowedMemory;
use crate::tools::Tool;

pub use executor::{AgentExecutor, FunctionCallingExecutor, DEFAULT_MAX_TOOL_ROUNDS};
pub use factory::{AgentFactory, TEMPERATURE};

/// Chat completion backend used by the executor.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        settings: &ModelSettings,
        messages: &[AgentMessage],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<ModelTurn>;
}

#[async_trait]
impl ChatModel for OpenAIClient {
    async fn complete(
        &self,
        settings: &ModelSettings,
        messages: &[AgentMessage],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<ModelTurn> {
        OpenAIClient::complete(self, settings, messages, tools).await
    }
}

/// Final answer of one turn plus the images tools produced along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentReply {
    pub text: String,
    pub image_urls: Vec<String>,
}

/// Request-scoped agent. Consumed by [`Agent::run`].
pub struct Agent {
    pub(crate) chat_id: String,
    pub(crate) settings: ModelSettings,
    pub(crate) system_prompt: String,
    pub(crate) tools: Vec<Arc<dyn Tool>>,
    pub(crate) memory: WindowedMemory,
    pub(crate) model: Arc<dyn ChatModel>,
    pub(crate) executor: Arc<dyn AgentExecutor>,
}

impl Agent {
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn memory(&self) -> &WindowedMemory {
        &self.memory
    }

    /// System prompt, memory window, then the new human input.
    pub async fn build_messages(&self, input: &str) -> Result<Vec<AgentMessage>> {
        let history = self.memory.load().await?;
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(AgentMessage::System(self.system_prompt.clone()));
        messages.extend(history.into_iter().map(to_agent_message));
        messages.push(AgentMessage::User(input.to_string()));
        Ok(messages)
    }

    /// Runs the turn and records it in memory. Errors propagate unchanged; nothing is saved then.
    #[instrument(skip(self, input), fields(chat_id = %self.chat_id))]
    pub async fn run(self, input: &str) -> Result<AgentReply> {
        let messages = self.build_messages(input).await?;
        info!(
            chat_id = %self.chat_id,
            model = %self.settings.model,
            history = messages.len() - 2,
            tools = ?self.tool_names(),
            "step: agent run started"
        );

        let reply = self
            .executor
            .execute(self.model.as_ref(), &self.settings, messages, &self.tools)
            .await?;

        self.memory.save_turn(input, &reply.text).await?;
        info!(
            chat_id = %self.chat_id,
            reply_len = reply.text.len(),
            images = reply.image_urls.len(),
            "step: agent run finished"
        );
        Ok(reply)
    }
}

fn to_agent_message(message: ChatMessage) -> AgentMessage {
    match message.role {
        MessageRole::System => AgentMessage::System(message.content),
        MessageRole::User => AgentMessage::User(message.content),
        MessageRole::Assistant => AgentMessage::assistant_text(message.content),
    }
}
