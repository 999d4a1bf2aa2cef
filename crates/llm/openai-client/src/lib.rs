//! # OpenAI API client
//!
//! Thin wrapper around [async-openai] for chat completion with function calling.
//! Provides token masking for safe logging, per-request [`ModelSettings`] and an
//! opt-in bounded response cache owned by the client instance.

use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolArgs, ChatCompletionToolType,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObjectArgs,
};
use async_openai::Client;
use std::sync::Arc;

mod cache;
mod types;

use cache::ResponseCache;
pub use cache::DEFAULT_CACHE_CAPACITY;
pub use types::{AgentMessage, ModelSettings, ModelTurn, ToolCall, ToolDefinition};

/// Masks an API key/token for safe logging: shows first 7 chars + "***" + last 4 chars.
/// If length <= 11, returns "***" to avoid leaking any part of the key.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 || !token.is_char_boundary(7) || !token.is_char_boundary(len - 4) {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// OpenAI chat client. Cheap to clone; clones share the HTTP client and the response cache.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Arc<Client<async_openai::config::OpenAIConfig>>,
    /// API key stored only for logging (masked).
    api_key_for_logging: Option<String>,
    cache: Arc<ResponseCache>,
}

impl OpenAIClient {
    /// Builds a client using the given API key and default API base URL.
    pub fn new(api_key: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging,
            cache: Arc::new(ResponseCache::new(DEFAULT_CACHE_CAPACITY)),
        }
    }

    /// Builds a client with a custom base URL (e.g. for proxies or compatible endpoints).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let api_key_for_logging = Some(api_key.clone());
        let config = async_openai::config::OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Self {
            client: Arc::new(Client::with_config(config)),
            api_key_for_logging,
            cache: Arc::new(ResponseCache::new(DEFAULT_CACHE_CAPACITY)),
        }
    }

    /// Replaces the response cache with an empty one holding at most `capacity` entries.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = Arc::new(ResponseCache::new(capacity));
        self
    }

    /// Number of cached responses (only grows when requests are sent with `cache = true`).
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.capacity()
    }

    /// Sends one chat completion request and returns either the final text or the tool calls.
    ///
    /// Logs masked API key and token usage. Errors from the API are returned unchanged; no retries.
    pub async fn complete(
        &self,
        settings: &ModelSettings,
        messages: &[AgentMessage],
        tools: &[ToolDefinition],
    ) -> anyhow::Result<ModelTurn> {
        let masked = self
            .api_key_for_logging
            .as_deref()
            .map(mask_token)
            .unwrap_or_else(|| "***".to_string());

        tracing::info!(
            model = %settings.model,
            temperature = settings.temperature,
            message_count = messages.len(),
            tool_count = tools.len(),
            api_key = %masked,
            "OpenAI chat_completion request"
        );

        let request = build_request(settings, messages, tools)?;

        let cache_key = if settings.cache {
            let key = serde_json::to_string(&request)?;
            if let Some(hit) = self.cache.get(&key) {
                tracing::info!(model = %settings.model, "OpenAI chat_completion cache hit");
                return Ok(hit);
            }
            Some(key)
        } else {
            None
        };

        let response = self.client.chat().create(request).await?;

        if let Some(ref u) = response.usage {
            tracing::info!(
                prompt_tokens = u.prompt_tokens,
                completion_tokens = u.completion_tokens,
                total_tokens = u.total_tokens,
                "OpenAI chat_completion usage"
            );
        }

        let choice = response
            .choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No response from OpenAI"))?;

        let turn = match choice.message.tool_calls.as_ref() {
            Some(calls) if !calls.is_empty() => ModelTurn::ToolCalls {
                content: choice.message.content.clone().filter(|c| !c.trim().is_empty()),
                calls: calls
                    .iter()
                    .map(|c| ToolCall {
                        id: c.id.clone(),
                        name: c.function.name.clone(),
                        arguments: c.function.arguments.clone(),
                    })
                    .collect(),
            },
            _ => ModelTurn::Message(choice.message.content.clone().unwrap_or_default()),
        };

        if let Some(key) = cache_key {
            self.cache.insert(key, turn.clone());
            tracing::debug!(cached = self.cache.len(), "OpenAI chat_completion cached");
        }

        Ok(turn)
    }
}

/// Converts agent messages and tool definitions into an async-openai request.
pub fn build_request(
    settings: &ModelSettings,
    messages: &[AgentMessage],
    tools: &[ToolDefinition],
) -> anyhow::Result<CreateChatCompletionRequest> {
    let openai_messages = messages
        .iter()
        .map(to_openai_message)
        .collect::<anyhow::Result<Vec<_>>>()?;

    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(settings.model.clone())
        .messages(openai_messages)
        .temperature(settings.temperature);
    if !tools.is_empty() {
        let openai_tools = tools
            .iter()
            .map(to_openai_tool)
            .collect::<anyhow::Result<Vec<_>>>()?;
        args.tools(openai_tools);
    }
    Ok(args.build()?)
}

fn to_openai_message(msg: &AgentMessage) -> anyhow::Result<ChatCompletionRequestMessage> {
    let out: ChatCompletionRequestMessage = match msg {
        AgentMessage::System(content) => ChatCompletionRequestSystemMessageArgs::default()
            .content(content.clone())
            .build()?
            .into(),
        AgentMessage::User(content) => ChatCompletionRequestUserMessageArgs::default()
            .content(content.clone())
            .build()?
            .into(),
        AgentMessage::Assistant {
            content,
            tool_calls,
        } => {
            let mut args = ChatCompletionRequestAssistantMessageArgs::default();
            if let Some(c) = content {
                args.content(c.clone());
            }
            if !tool_calls.is_empty() {
                args.tool_calls(
                    tool_calls
                        .iter()
                        .map(|c| ChatCompletionMessageToolCall {
                            id: c.id.clone(),
                            r#type: ChatCompletionToolType::Function,
                            function: FunctionCall {
                                name: c.name.clone(),
                                arguments: c.arguments.clone(),
                            },
                        })
                        .collect::<Vec<_>>(),
                );
            }
            args.build()?.into()
        }
        AgentMessage::Tool { call_id, content } => ChatCompletionRequestToolMessageArgs::default()
            .content(content.clone())
            .tool_call_id(call_id.clone())
            .build()?
            .into(),
    };
    Ok(out)
}

fn to_openai_tool(tool: &ToolDefinition) -> anyhow::Result<ChatCompletionTool> {
    Ok(ChatCompletionToolArgs::default()
        .r#type(ChatCompletionToolType::Function)
        .function(
            FunctionObjectArgs::default()
                .name(tool.name.clone())
                .description(tool.description.clone())
                .parameters(tool.parameters.clone())
                .build()?,
        )
        .build()?)
}
