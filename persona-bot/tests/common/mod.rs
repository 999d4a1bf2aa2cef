//! Shared helpers for persona-bot integration tests.
#![allow(dead_code)]

pub mod mock_bot;
pub mod mock_model;

use std::collections::HashMap;
use std::sync::Arc;

use persona_bot::{AgentFactory, ChatModel, PersonaBotConfig};
use telegram_bot::{InMemoryHistoryStore, Message, User};

/// Config from `BOT_TOKEN=T`, `PERSONALITY=SACHA` plus `extra`.
pub fn test_config(extra: &[(&str, &str)]) -> PersonaBotConfig {
    let mut values: HashMap<String, String> = HashMap::new();
    values.insert("BOT_TOKEN".into(), "T".into());
    values.insert("PERSONALITY".into(), "SACHA".into());
    for (k, v) in extra {
        values.insert(k.to_string(), v.to_string());
    }
    PersonaBotConfig::from_map(&values).unwrap()
}

/// Factory over an unbounded in-memory store and the given model.
pub fn factory_with_model(
    config: PersonaBotConfig,
    model: Arc<dyn ChatModel>,
) -> (AgentFactory, Arc<InMemoryHistoryStore>) {
    let store = Arc::new(InMemoryHistoryStore::new());
    let factory = AgentFactory::with_model(Arc::new(config), store.clone(), model);
    (factory, store)
}

pub fn text_message(chat_id: i64, text: &str) -> Message {
    let user = User {
        id: 7,
        username: Some("tester".to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
    };
    Message::incoming_text(chat_id, user, text)
}
