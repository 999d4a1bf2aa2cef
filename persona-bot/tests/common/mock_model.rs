//! Scripted [`persona_bot::ChatModel`] implementations.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use openai_client::{AgentMessage, ModelSettings, ModelTurn, ToolCall, ToolDefinition};
use persona_bot::ChatModel;

/// One request as the model saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub settings: ModelSettings,
    pub messages: Vec<AgentMessage>,
    pub tool_names: Vec<String>,
}

/// Returns queued turns in order; once the queue is empty it echoes the last user message.
/// Tracks how many calls run at the same time.
#[derive(Default)]
pub struct ScriptedModel {
    turns: Mutex<VecDeque<ModelTurn>>,
    pub seen: Mutex<Vec<SeenRequest>>,
    delay: Option<Duration>,
    active: AtomicUsize,
    pub max_active: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(turns: Vec<ModelTurn>) -> Self {
        Self {
            turns: Mutex::new(turns.into()),
            ..Default::default()
        }
    }

    pub fn echo() -> Self {
        Self::default()
    }

    pub fn slow_echo(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

pub fn tool_call(id: &str, name: &str, arguments: &str) -> ModelTurn {
    ModelTurn::ToolCalls {
        content: None,
        calls: vec![ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }],
    }
}

fn last_user(messages: &[AgentMessage]) -> String {
    messages
        .iter()
        .rev()
        .find_map(|m| match m {
            AgentMessage::User(text) => Some(text.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(
        &self,
        settings: &ModelSettings,
        messages: &[AgentMessage],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<ModelTurn> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        self.seen.lock().unwrap().push(SeenRequest {
            settings: settings.clone(),
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.turns.lock().unwrap().pop_front();

        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(next.unwrap_or_else(|| ModelTurn::Message(format!("echo: {}", last_user(messages)))))
    }
}

/// Always fails like an upstream API error.
pub struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn complete(
        &self,
        _settings: &ModelSettings,
        _messages: &[AgentMessage],
        _tools: &[ToolDefinition],
    ) -> anyhow::Result<ModelTurn> {
        anyhow::bail!("HTTP 503 Service Unavailable")
    }
}
