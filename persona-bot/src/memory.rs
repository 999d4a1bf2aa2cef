//! Conversation memory: a sliding window of the last [`MEMORY_WINDOW_SIZE`] exchanges per chat.

use std::sync::Arc;

use prompt::ChatMessage;
use telegram_bot::{ChatHistoryStore, InMemoryHistoryStore, Result, SqliteHistoryStore};
use tracing::{debug, info};

use crate::config::{MemoryStoreType, PersonaBotConfig};

/// Human/assistant pairs kept in the window.
pub const MEMORY_WINDOW_SIZE: usize = 10;

/// Instance handle used when none is configured.
pub const LOCAL_INSTANCE_HANDLE: &str = "local-instance-handle";

/// History key for a chat on one deployment instance.
pub fn memory_key(chat_id: &str, instance_handle: &str) -> String {
    format!("history-{}-{}", chat_id, instance_handle)
}

/// Opens the history store selected by `MEMORY_STORE_TYPE`.
pub async fn create_history_store(config: &PersonaBotConfig) -> Result<Arc<dyn ChatHistoryStore>> {
    match config.memory.store_type {
        MemoryStoreType::Memory => {
            info!("Using in-memory chat history");
            Ok(Arc::new(InMemoryHistoryStore::with_max_messages(
                MEMORY_WINDOW_SIZE * 2,
            )))
        }
        MemoryStoreType::Sqlite => {
            let store = SqliteHistoryStore::new(&config.memory.sqlite_path).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Hands out chat-scoped memory windows over one shared store.
#[derive(Clone)]
pub struct MemoryAccessor {
    store: Arc<dyn ChatHistoryStore>,
    instance_handle: String,
    window: usize,
}

impl MemoryAccessor {
    pub fn new(store: Arc<dyn ChatHistoryStore>, instance_handle: Option<String>) -> Self {
        Self {
            store,
            instance_handle: instance_handle.unwrap_or_else(|| LOCAL_INSTANCE_HANDLE.to_string()),
            window: MEMORY_WINDOW_SIZE,
        }
    }

    pub fn instance_handle(&self) -> &str {
        &self.instance_handle
    }

    pub fn get_memory(&self, chat_id: &str) -> WindowedMemory {
        WindowedMemory {
            store: self.store.clone(),
            key: memory_key(chat_id, &self.instance_handle),
            window: self.window,
        }
    }
}

/// Memory bound to one history key.
#[derive(Clone)]
pub struct WindowedMemory {
    store: Arc<dyn ChatHistoryStore>,
    key: String,
    window: usize,
}

impl WindowedMemory {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// At most `window` most recent pairs, oldest first.
    pub async fn load(&self) -> Result<Vec<ChatMessage>> {
        let messages = self.store.recent(&self.key, self.window * 2).await?;
        debug!(key = %self.key, count = messages.len(), "Memory loaded");
        Ok(messages)
    }

    pub async fn save_turn(&self, human: &str, ai: &str) -> Result<()> {
        self.store
            .append(&self.key, ChatMessage::user(human))
            .await?;
        self.store
            .append(&self.key, ChatMessage::assistant(ai))
            .await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear(&self.key).await
    }
}
