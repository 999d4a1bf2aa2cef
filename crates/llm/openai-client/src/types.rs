//! Request/response types exchanged with the agent loop. Transport-agnostic: no async-openai types leak out.

use serde::{Deserialize, Serialize};

/// Sampling model, temperature and caching for one chat request.
///
/// `cache` replaces a process-wide cache switch: when true the client reuses the
/// response for a byte-identical request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    pub model: String,
    pub temperature: f32,
    pub cache: bool,
}

impl ModelSettings {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature,
            cache: false,
        }
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }
}

/// A tool the model may call, in OpenAI function-calling form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// A tool call requested by the model. `arguments` is the raw JSON string the model produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// One message in an agent conversation, including tool traffic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AgentMessage {
    System(String),
    User(String),
    Assistant {
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        call_id: String,
        content: String,
    },
}

impl AgentMessage {
    pub fn assistant_text(content: impl Into<String>) -> Self {
        AgentMessage::Assistant {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// What the model answered for one request: final text, or tool calls to execute first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModelTurn {
    Message(String),
    ToolCalls {
        content: Option<String>,
        calls: Vec<ToolCall>,
    },
}
