//! Builds one agent per chat turn from the shared config, clients and stores.

use std::sync::Arc;

use openai_client::{mask_token, ModelSettings, OpenAIClient};
use telegram_bot::{ChatHistoryStore, Result};
use tracing::{info, instrument};

use super::{Agent, AgentExecutor, ChatModel, FunctionCallingExecutor};
use crate::config::PersonaBotConfig;
use crate::memory::MemoryAccessor;
use crate::persona::build_prefix;
use crate::tools::{SpeechTool, ToolRegistry};

pub const TEMPERATURE: f32 = 0.7;

/// Owns everything shared between turns. Cheap to clone.
#[derive(Clone)]
pub struct AgentFactory {
    config: Arc<PersonaBotConfig>,
    model: Arc<dyn ChatModel>,
    executor: Arc<dyn AgentExecutor>,
    registry: ToolRegistry,
    memory: MemoryAccessor,
}

impl AgentFactory {
    /// Factory backed by the OpenAI client from config.
    pub fn new(config: Arc<PersonaBotConfig>, history: Arc<dyn ChatHistoryStore>) -> Self {
        info!(
            base_url = %config.openai_base_url,
            api_key = %mask_token(&config.openai_api_key),
            model = config.model_name(),
            "Creating OpenAI chat client"
        );
        let model: Arc<dyn ChatModel> = Arc::new(OpenAIClient::with_base_url(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
        ));
        Self::with_model(config, history, model)
    }

    /// Factory with a custom chat model (tests, other backends).
    pub fn with_model(
        config: Arc<PersonaBotConfig>,
        history: Arc<dyn ChatHistoryStore>,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        let registry = ToolRegistry::new(&config);
        let memory = MemoryAccessor::new(history, config.instance_handle.clone());
        Self {
            config,
            model,
            executor: Arc::new(FunctionCallingExecutor::default()),
            registry,
            memory,
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn AgentExecutor>) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn config(&self) -> &PersonaBotConfig {
        &self.config
    }

    pub fn memory(&self) -> &MemoryAccessor {
        &self.memory
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings::new(self.config.model_name(), TEMPERATURE).with_cache(self.config.llm_cache)
    }

    /// Persona prefix, tool instructions and suffix.
    pub fn system_prompt(&self, tool_names: &[String]) -> String {
        prompt::build_system_prompt(&build_prefix(self.config.persona), tool_names)
    }

    #[instrument(skip(self))]
    pub fn build_agent(&self, chat_id: &str) -> Result<Agent> {
        let tools = self.registry.get_tools(chat_id);
        let tool_names: Vec<String> = tools.iter().map(|t| t.name()).collect();
        let agent = Agent {
            chat_id: chat_id.to_string(),
            settings: self.model_settings(),
            system_prompt: self.system_prompt(&tool_names),
            tools,
            memory: self.memory.get_memory(chat_id),
            model: self.model.clone(),
            executor: self.executor.clone(),
        };
        info!(
            chat_id = %chat_id,
            persona = %self.config.persona,
            model = %agent.settings.model,
            tools = ?tool_names,
            memory_key = %agent.memory.key(),
            "Agent built"
        );
        Ok(agent)
    }

    /// Speech synthesis for replies; `None` unless both voice credentials are set.
    pub fn voice_tool(&self) -> Option<SpeechTool> {
        if !self.config.has_voice() {
            return None;
        }
        Some(SpeechTool::new(
            self.config.elevenlabs_api_key.clone(),
            self.config.elevenlabs_voice_id.clone(),
        ))
    }
}
