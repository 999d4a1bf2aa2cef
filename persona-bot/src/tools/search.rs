//! Web search through SerpAPI (Google engine).

use async_trait::async_trait;
use openai_client::ToolDefinition;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{info, instrument};

use super::{required_str, Tool, ToolError, ToolOutput};

pub const SEARCH_TOOL_NAME: &str = "search";
pub const SERPAPI_BASE_URL: &str = "https://serpapi.com";

const MAX_SNIPPETS: usize = 3;

#[derive(Clone)]
pub struct SearchTool {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SearchTool {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_key)
    }

    /// Uses a shared HTTP client (and its connection pool).
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: SERPAPI_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<String, ToolError> {
        if self.api_key.is_empty() {
            return Err(ToolError::NotConfigured("SERPAPI_API_KEY is empty".to_string()));
        }
        let url = format!("{}/search.json", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("engine", "google"), ("q", query), ("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ToolError::Upstream(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ToolError::Upstream(format!("HTTP {}: {}", status.as_u16(), body)));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ToolError::Upstream(format!("invalid JSON: {}", e.without_url())))?;
        if let Some(error) = payload.get("error").and_then(Value::as_str) {
            return Err(ToolError::Upstream(error.to_string()));
        }

        let answer = extract_answer(&payload)
            .unwrap_or_else(|| "No good search result found".to_string());
        info!(query = %query, answer_len = answer.len(), "Search finished");
        Ok(answer)
    }
}

/// Picks the most direct answer in a SerpAPI response: answer box, knowledge graph, then organic snippets.
fn extract_answer(root: &Value) -> Option<String> {
    if let Some(answer_box) = root.get("answer_box") {
        for key in ["answer", "snippet"] {
            if let Some(text) = answer_box.get(key).and_then(Value::as_str) {
                return Some(text.trim().to_string());
            }
        }
        if let Some(first) = answer_box
            .get("snippet_highlighted_words")
            .and_then(Value::as_array)
            .and_then(|words| words.first())
            .and_then(Value::as_str)
        {
            return Some(first.to_string());
        }
    }

    if let Some(description) = root
        .get("knowledge_graph")
        .and_then(|kg| kg.get("description"))
        .and_then(Value::as_str)
    {
        return Some(description.trim().to_string());
    }

    let snippets: Vec<&str> = root
        .get("organic_results")
        .and_then(Value::as_array)?
        .iter()
        .filter_map(|r| r.get("snippet").and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_SNIPPETS)
        .collect();
    if snippets.is_empty() {
        None
    } else {
        Some(snippets.join("\n"))
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn spec(&self) -> ToolDefinition {
        ToolDefinition {
            name: SEARCH_TOOL_NAME.to_string(),
            description: "Search the web for current events, facts or anything you do not know. \
                Input is a short search query."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string", "description": "Search query" }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, arguments: Value) -> Result<ToolOutput, ToolError> {
        let query = required_str(&arguments, "query")?;
        self.search(query).await.map(ToolOutput::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_extract_answer_prefers_answer_box() {
        let payload = json!({
            "answer_box": { "answer": "42" },
            "organic_results": [{ "snippet": "not this" }]
        });
        assert_eq!(extract_answer(&payload).as_deref(), Some("42"));
    }

    #[test]
    fn test_extract_answer_falls_back_to_snippets() {
        let payload = json!({
            "organic_results": [
                { "snippet": "first" }, { "title": "no snippet" }, { "snippet": "second" },
                { "snippet": "third" }, { "snippet": "fourth" }
            ]
        });
        assert_eq!(extract_answer(&payload).as_deref(), Some("first\nsecond\nthird"));
        assert_eq!(extract_answer(&json!({})), None);
    }

    #[tokio::test]
    async fn test_empty_key_is_not_configured() {
        let tool = SearchTool::new("");
        let err = tool.call(json!({ "query": "weather" })).await.unwrap_err();
        assert!(matches!(err, ToolError::NotConfigured(_)));
    }

    /// **Test: Query and key are sent as query parameters; the answer box is returned.**
    #[tokio::test]
    async fn test_search_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "weather in brussels".into()),
                Matcher::UrlEncoded("api_key".into(), "serp-key".into()),
                Matcher::UrlEncoded("engine".into(), "google".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer_box":{"snippet":"Rainy, 12°C"}}"#)
            .create_async()
            .await;

        let tool = SearchTool::new("serp-key").with_base_url(server.url());
        let out = tool
            .call(json!({ "query": "weather in brussels" }))
            .await
            .unwrap();

        assert_eq!(out, ToolOutput::text("Rainy, 12°C"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_http_error_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("Invalid API key")
            .create_async()
            .await;

        let tool = SearchTool::new("bad").with_base_url(server.url());
        let err = tool.call(json!({ "query": "x" })).await.unwrap_err();
        assert_eq!(err, ToolError::Upstream("HTTP 401: Invalid API key".to_string()));
    }

    /// **Test: A connection failure reports the error without the request URL or the key.**
    #[tokio::test]
    async fn test_connection_error_hides_api_key() {
        let tool = SearchTool::new("serp-SECRET-KEY-123456").with_base_url("http://127.0.0.1:1");
        let err = tool.call(json!({ "query": "weather" })).await.unwrap_err();

        assert!(matches!(err, ToolError::Upstream(_)));
        let observation = format!("Error: {}", err.into_bot_error(SEARCH_TOOL_NAME));
        assert!(!observation.contains("serp-SECRET-KEY-123456"), "{}", observation);
        assert!(!observation.contains("api_key="), "{}", observation);
    }

    /// **Test: A body that is not JSON is reported without the request URL or the key.**
    #[tokio::test]
    async fn test_invalid_json_hides_api_key() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let tool = SearchTool::with_client(Client::new(), "serp-SECRET-KEY-123456")
            .with_base_url(server.url());
        let err = tool.call(json!({ "query": "x" })).await.unwrap_err();
        assert!(!err.to_string().contains("serp-SECRET-KEY-123456"), "{}", err);
    }
}
