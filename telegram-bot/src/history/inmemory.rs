//! In-memory implementation of [`ChatHistoryStore`].

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use prompt::ChatMessage;
use tokio::sync::RwLock;
use tracing::debug;

use super::ChatHistoryStore;
use crate::core::Result;

type HistoryMap = HashMap<String, VecDeque<ChatMessage>>;

/// Process-local history. With a message cap, the oldest messages are dropped on append.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    entries: Arc<RwLock<HistoryMap>>,
    max_messages: Option<usize>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps at most `max_messages` per key.
    pub fn with_max_messages(max_messages: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HistoryMap::new())),
            max_messages: Some(max_messages),
        }
    }

    /// Number of messages currently held for `key`.
    pub async fn len(&self, key: &str) -> usize {
        self.entries.read().await.get(key).map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl ChatHistoryStore for InMemoryHistoryStore {
    async fn append(&self, key: &str, message: ChatMessage) -> Result<()> {
        let mut entries = self.entries.write().await;
        let log = entries.entry(key.to_string()).or_default();
        log.push_back(message);
        if let Some(max) = self.max_messages {
            while log.len() > max {
                log.pop_front();
            }
        }
        debug!(key = %key, len = log.len(), "History appended (in-memory)");
        Ok(())
    }

    async fn recent(&self, key: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let entries = self.entries.read().await;
        let Some(log) = entries.get(key) else {
            return Ok(Vec::new());
        };
        let skip = log.len().saturating_sub(limit);
        Ok(log.iter().skip(skip).cloned().collect())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}
