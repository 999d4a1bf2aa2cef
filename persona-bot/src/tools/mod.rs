//! Agent tools and the per-turn tool registry.
//!
//! A tool exposes an OpenAI function definition ([`Tool::spec`]) and executes one call with the
//! JSON arguments the model produced ([`Tool::call`]). Failures are [`ToolError`]s; the agent
//! loop hands their text back to the model as the observation.

mod image;
mod search;
mod selfie;
mod speech;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use image_generation_client::ImageGenerationClient;
use openai_client::ToolDefinition;
use serde_json::Value;
use telegram_bot::{BotError, Result};
use thiserror::Error;
use tracing::debug;

use crate::config::PersonaBotConfig;
use crate::persona::Persona;

pub use image::{GenerateImageTool, GENERATE_IMAGE_TOOL_NAME};
pub use search::{SearchTool, SEARCH_TOOL_NAME, SERPAPI_BASE_URL};
pub use selfie::{SelfieTool, SELFIE_TOOL_NAME};
pub use speech::SpeechTool;

/// Result of one tool call. `image_url` is set by tools that produce an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub image_url: Option<String>,
}

impl ToolOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_url: None,
        }
    }

    pub fn image(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image_url: Some(url.into()),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not configured: {0}")]
    NotConfigured(String),

    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl ToolError {
    /// Wraps the error as a [`BotError::ToolInvocation`] for `tool`.
    pub fn into_bot_error(self, tool: &str) -> BotError {
        BotError::tool(tool, self.to_string())
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolDefinition;

    async fn call(&self, arguments: Value) -> std::result::Result<ToolOutput, ToolError>;

    fn name(&self) -> String {
        self.spec().name
    }
}

/// Reads a required non-empty string argument.
pub(crate) fn required_str<'a>(
    arguments: &'a Value,
    key: &str,
) -> std::result::Result<&'a str, ToolError> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::InvalidInput(format!("missing or invalid '{}'", key)))
}

/// Capability descriptor from the `TOOLS` config list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Search,
    Selfie,
    Image,
}

impl ToolKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "search" => Ok(ToolKind::Search),
            "selfie" => Ok(ToolKind::Selfie),
            "image" => Ok(ToolKind::Image),
            other => Err(BotError::config(format!(
                "TOOLS entry '{}' is unknown (expected search, selfie or image)",
                other
            ))),
        }
    }

    /// Parses a comma-separated list; order is kept, duplicates are rejected.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>> {
        let mut kinds = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let kind = Self::parse(part)?;
            if kinds.contains(&kind) {
                return Err(BotError::config(format!("TOOLS lists '{}' twice", kind)));
            }
            kinds.push(kind);
        }
        Ok(kinds)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToolKind::Search => "search",
            ToolKind::Selfie => "selfie",
            ToolKind::Image => "image",
        })
    }
}

/// Builds the tool list for one turn from the configured [`ToolKind`]s.
#[derive(Clone)]
pub struct ToolRegistry {
    kinds: Vec<ToolKind>,
    persona: Persona,
    serpapi_api_key: String,
    serpapi_base_url: String,
    http: reqwest::Client,
    images: ImageGenerationClient,
}

impl ToolRegistry {
    pub fn new(config: &PersonaBotConfig) -> Self {
        let images = ImageGenerationClient::with_base_url(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
        );
        Self {
            kinds: config.tools.clone(),
            persona: config.persona,
            serpapi_api_key: config.serpapi_api_key.clone(),
            serpapi_base_url: SERPAPI_BASE_URL.to_string(),
            http: reqwest::Client::new(),
            images,
        }
    }

    /// Points the search tool at another SerpAPI-compatible endpoint.
    pub fn with_serpapi_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.serpapi_base_url = base_url.into();
        self
    }

    pub fn kinds(&self) -> &[ToolKind] {
        &self.kinds
    }

    /// Fresh tool instances in configured order. Clients are shared across turns.
    pub fn get_tools(&self, chat_id: &str) -> Vec<Arc<dyn Tool>> {
        let tools: Vec<Arc<dyn Tool>> = self
            .kinds
            .iter()
            .map(|kind| -> Arc<dyn Tool> {
                match kind {
                    ToolKind::Search => Arc::new(
                        SearchTool::with_client(self.http.clone(), self.serpapi_api_key.clone())
                            .with_base_url(self.serpapi_base_url.clone()),
                    ),
                    ToolKind::Selfie => {
                        Arc::new(SelfieTool::new(self.images.clone(), self.persona))
                    }
                    ToolKind::Image => Arc::new(GenerateImageTool::new(self.images.clone())),
                }
            })
            .collect();
        debug!(
            chat_id = %chat_id,
            tools = ?tools.iter().map(|t| t.name()).collect::<Vec<_>>(),
            "Tools built for turn"
        );
        tools
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_keeps_order() {
        assert_eq!(
            ToolKind::parse_list(" selfie, SEARCH ,image").unwrap(),
            vec![ToolKind::Selfie, ToolKind::Search, ToolKind::Image]
        );
        assert!(ToolKind::parse_list("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_list_rejects_unknown_and_duplicates() {
        assert!(matches!(
            ToolKind::parse_list("search,search"),
            Err(BotError::ConfigValidation(_))
        ));
        assert!(matches!(
            ToolKind::parse_list("search,video"),
            Err(BotError::ConfigValidation(_))
        ));
    }

    /// **Test: Search tools from separate turns reuse the registry's client and base URL.**
    #[tokio::test]
    async fn test_search_tools_across_turns_share_registry_client() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer_box":{"answer":"42"}}"#)
            .expect(2)
            .create_async()
            .await;

        let values: std::collections::HashMap<String, String> = [
            ("BOT_TOKEN", "T"),
            ("PERSONALITY", "SACHA"),
            ("SERPAPI_API_KEY", "serp-key"),
            ("TOOLS", "search"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let config = PersonaBotConfig::from_map(&values).unwrap();
        let registry = ToolRegistry::new(&config).with_serpapi_base_url(server.url());

        for chat_id in ["1", "2"] {
            let tools = registry.get_tools(chat_id);
            assert_eq!(tools.len(), 1);
            let out = tools[0].call(serde_json::json!({ "query": "q" })).await.unwrap();
            assert_eq!(out.text, "42");
        }
        mock.assert_async().await;
    }

    #[test]
    fn test_required_str() {
        let args = serde_json::json!({ "query": "  rust  ", "blank": " " });
        assert_eq!(required_str(&args, "query").unwrap(), "rust");
        assert!(required_str(&args, "blank").is_err());
        assert!(required_str(&args, "missing").is_err());
    }

    #[test]
    fn test_tool_error_maps_to_tool_invocation() {
        let err = ToolError::Upstream("HTTP 500".into()).into_bot_error("search");
        assert!(matches!(err, BotError::ToolInvocation { ref tool, .. } if tool == "search"));
    }
}
