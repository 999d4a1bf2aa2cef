//! Tests for the function-calling loop behind [`persona_bot::Agent::run`].

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::mock_model::{tool_call, FailingModel, ScriptedModel};
use common::{factory_with_model, test_config};
use openai_client::{AgentMessage, ModelTurn, ToolDefinition};
use persona_bot::{FunctionCallingExecutor, Tool, ToolError, ToolKind, ToolOutput, ToolRegistry};
use serde_json::{json, Value};
use telegram_bot::{BotError, ChatHistoryStore};

/// **Test: Model calls a tool, sees its observation, then answers.**
///
/// Uses the real search tool against a mock SerpAPI server.
#[tokio::test]
async fn test_tool_round_trip() {
    let mut server = mockito::Server::new_async().await;
    let _serp = server
        .mock("GET", "/search.json")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"answer_box":{"answer":"Sunny"}}"#)
        .create_async()
        .await;

    let config = test_config(&[("SERPAPI_API_KEY", "serp")]);
    let model = Arc::new(ScriptedModel::new(vec![
        tool_call("call_1", "search", r#"{"query":"weather brussels"}"#),
        ModelTurn::Message("It's sunny in Brussels!".to_string()),
    ]));
    let (factory, _store) = factory_with_model(config.clone(), model.clone());
    let factory = factory.with_registry(ToolRegistry::new(&config).with_serpapi_base_url(server.url()));

    let reply = factory.build_agent("5").unwrap().run("how's the weather?").await.unwrap();

    assert_eq!(reply.text, "It's sunny in Brussels!");
    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].tool_names, vec!["search", "selfie"]);
    let last = requests[1].messages.last().unwrap();
    assert_eq!(
        last,
        &AgentMessage::Tool {
            call_id: "call_1".to_string(),
            content: "Sunny".to_string()
        }
    );
}

/// **Test: Tool failures, unknown tools and bad JSON become observations, not errors.**
#[tokio::test]
async fn test_tool_failures_are_observations() {
    let config = test_config(&[]);
    let model = Arc::new(ScriptedModel::new(vec![
        tool_call("c1", "search", r#"{"query":"x"}"#),
        tool_call("c2", "teleport", "{}"),
        tool_call("c3", "selfie", "{not json"),
        ModelTurn::Message("Sorry, I couldn't look that up.".to_string()),
    ]));
    let (factory, _store) = factory_with_model(config, model.clone());

    let reply = factory.build_agent("5").unwrap().run("search x").await.unwrap();
    assert_eq!(reply.text, "Sorry, I couldn't look that up.");

    let observations: Vec<String> = model.requests()[3]
        .messages
        .iter()
        .filter_map(|m| match m {
            AgentMessage::Tool { content, .. } => Some(content.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(observations.len(), 3);
    assert!(observations[0].starts_with("Error: Tool 'search' failed: not configured"));
    assert_eq!(observations[1], "Error: tool 'teleport' does not exist");
    assert!(observations[2].starts_with("Error: arguments are not valid JSON"));
}

struct PictureTool(Arc<AtomicUsize>);

#[async_trait]
impl Tool for PictureTool {
    fn spec(&self) -> ToolDefinition {
        ToolDefinition {
            name: "picture".to_string(),
            description: "test picture".to_string(),
            parameters: json!({ "type": "object", "properties": {} }),
        }
    }

    async fn call(&self, _arguments: Value) -> Result<ToolOutput, ToolError> {
        let n = self.0.fetch_add(1, Ordering::SeqCst);
        Ok(ToolOutput::image(format!("https://img.example/{}.png", n), "attached"))
    }
}

/// **Test: Images produced by tools are collected in order on the reply.**
#[tokio::test]
async fn test_executor_collects_images() {
    let calls = Arc::new(AtomicUsize::new(0));
    let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(PictureTool(calls.clone()))];
    let model = ScriptedModel::new(vec![
        tool_call("a", "picture", ""),
        tool_call("b", "picture", "{}"),
        ModelTurn::Message("  two pics for you  ".to_string()),
    ]);

    let reply = persona_bot::AgentExecutor::execute(
        &FunctionCallingExecutor::default(),
        &model,
        &openai_client::ModelSettings::new("gpt-4", 0.7),
        vec![AgentMessage::User("pics".to_string())],
        &tools,
    )
    .await
    .unwrap();

    assert_eq!(reply.text, "two pics for you");
    assert_eq!(
        reply.image_urls,
        vec!["https://img.example/0.png", "https://img.example/1.png"]
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// **Test: A model that never stops calling tools is cut off; the last round offers no tools.**
#[tokio::test]
async fn test_executor_bounds_tool_rounds() {
    let calls = Arc::new(AtomicUsize::new(0));
    let tools: Vec<Arc<dyn Tool>> = vec![Arc::new(PictureTool(calls.clone()))];
    let model = ScriptedModel::new(vec![tool_call("x", "picture", "{}"); 3]);

    let err = persona_bot::AgentExecutor::execute(
        &FunctionCallingExecutor::new(2),
        &model,
        &openai_client::ModelSettings::new("gpt-4", 0.7),
        vec![AgentMessage::User("loop".to_string())],
        &tools,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, BotError::Llm(ref m) if m.contains("2 tool rounds")));
    let requests = model.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[2].tool_names.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

/// **Test: Model errors propagate as BotError::Llm and nothing is saved to memory.**
#[tokio::test]
async fn test_model_error_propagates_unchanged() {
    let (factory, store) = factory_with_model(test_config(&[]), Arc::new(FailingModel));
    let agent = factory.build_agent("77").unwrap();
    let key = agent.memory().key().to_string();

    let err = agent.run("hello").await.unwrap_err();

    assert!(matches!(err, BotError::Llm(ref m) if m.contains("503")));
    assert!(store.recent(&key, 100).await.unwrap().is_empty());
}

/// **Test: After 15 turns only the 10 most recent pairs reach the model.**
#[tokio::test]
async fn test_memory_window_feeds_last_ten_pairs() {
    let model = Arc::new(ScriptedModel::echo());
    let (factory, _store) = factory_with_model(test_config(&[]), model.clone());

    for i in 0..15 {
        factory.build_agent("3").unwrap().run(&format!("m{}", i)).await.unwrap();
    }
    factory.build_agent("3").unwrap().run("last").await.unwrap();

    let requests = model.requests();
    let messages = &requests.last().unwrap().messages;
    // system + 10 pairs + new input
    assert_eq!(messages.len(), 22);
    assert!(matches!(messages[0], AgentMessage::System(_)));
    assert_eq!(messages[1], AgentMessage::User("m5".to_string()));
    assert_eq!(messages[2], AgentMessage::assistant_text("echo: m5"));
    assert_eq!(messages[20], AgentMessage::assistant_text("echo: m14"));
    assert_eq!(messages[21], AgentMessage::User("last".to_string()));
}

/// **Test: TOOLS set to an empty value sends no tool definitions.**
#[tokio::test]
async fn test_no_tools_configured() {
    let model = Arc::new(ScriptedModel::echo());
    let config = test_config(&[("TOOLS", "")]);
    assert!(config.tools.is_empty());
    assert!(!config.tools.contains(&ToolKind::Search));
    let (factory, _store) = factory_with_model(config, model.clone());

    factory.build_agent("1").unwrap().run("hi").await.unwrap();

    assert!(model.requests()[0].tool_names.is_empty());
}
