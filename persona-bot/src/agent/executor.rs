//! Function-calling loop: ask the model, run requested tools, feed observations back, repeat.

use std::sync::Arc;

use async_trait::async_trait;
use openai_client::{AgentMessage, ModelSettings, ModelTurn, ToolCall, ToolDefinition};
use serde_json::Value;
use telegram_bot::{BotError, Result};
use tracing::{info, warn};

use super::{AgentReply, ChatModel};
use crate::tools::Tool;

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

#[async_trait]
pub trait AgentExecutor: Send + Sync {
    async fn execute(
        &self,
        model: &dyn ChatModel,
        settings: &ModelSettings,
        messages: Vec<AgentMessage>,
        tools: &[Arc<dyn Tool>],
    ) -> Result<AgentReply>;
}

/// OpenAI function-calling executor with a bound on tool rounds. No retries.
#[derive(Debug, Clone, Copy)]
pub struct FunctionCallingExecutor {
    max_tool_rounds: usize,
}

impl Default for FunctionCallingExecutor {
    fn default() -> Self {
        Self {
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }
}

impl FunctionCallingExecutor {
    pub fn new(max_tool_rounds: usize) -> Self {
        Self { max_tool_rounds }
    }

    /// Runs one call. Every failure becomes an observation string for the model.
    async fn observe(tools: &[Arc<dyn Tool>], call: &ToolCall, images: &mut Vec<String>) -> String {
        let Some(tool) = tools.iter().find(|t| t.name() == call.name) else {
            warn!(tool = %call.name, "Model requested unknown tool");
            return format!("Error: tool '{}' does not exist", call.name);
        };

        let arguments: Value = if call.arguments.trim().is_empty() {
            Value::Object(Default::default())
        } else {
            match serde_json::from_str(&call.arguments) {
                Ok(v) => v,
                Err(e) => {
                    warn!(tool = %call.name, error = %e, "Tool arguments are not valid JSON");
                    return format!("Error: arguments are not valid JSON: {}", e);
                }
            }
        };

        match tool.call(arguments).await {
            Ok(output) => {
                info!(tool = %call.name, has_image = output.image_url.is_some(), "Tool call succeeded");
                if let Some(url) = output.image_url {
                    images.push(url);
                }
                output.text
            }
            Err(e) => {
                let err = e.into_bot_error(&call.name);
                warn!(error = %err, "Tool call failed");
                format!("Error: {}", err)
            }
        }
    }
}

#[async_trait]
impl AgentExecutor for FunctionCallingExecutor {
    async fn execute(
        &self,
        model: &dyn ChatModel,
        settings: &ModelSettings,
        mut messages: Vec<AgentMessage>,
        tools: &[Arc<dyn Tool>],
    ) -> Result<AgentReply> {
        let definitions: Vec<ToolDefinition> = tools.iter().map(|t| t.spec()).collect();
        let mut image_urls = Vec::new();

        for round in 0..=self.max_tool_rounds {
            // Last round: no tools offered so the model has to answer.
            let offered: &[ToolDefinition] = if round < self.max_tool_rounds {
                definitions.as_slice()
            } else {
                &[]
            };
            let turn = model
                .complete(settings, &messages, offered)
                .await
                .map_err(|e| BotError::Llm(format!("{:#}", e)))?;

            match turn {
                ModelTurn::Message(text) => {
                    return Ok(AgentReply {
                        text: text.trim().to_string(),
                        image_urls,
                    });
                }
                ModelTurn::ToolCalls { content, calls } => {
                    if round == self.max_tool_rounds {
                        warn!(round = round, "Model kept calling tools after the last round");
                        break;
                    }
                    info!(
                        round = round,
                        calls = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                        "Model requested tools"
                    );
                    messages.push(AgentMessage::Assistant {
                        content,
                        tool_calls: calls.clone(),
                    });
                    for call in &calls {
                        let observation = Self::observe(tools, call, &mut image_urls).await;
                        messages.push(AgentMessage::Tool {
                            call_id: call.id.clone(),
                            content: observation,
                        });
                    }
                }
            }
        }

        Err(BotError::Llm(format!(
            "agent stopped after {} tool rounds without a final answer",
            self.max_tool_rounds
        )))
    }
}
