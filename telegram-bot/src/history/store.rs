use async_trait::async_trait;
use prompt::ChatMessage;

use crate::core::Result;

/// Append-only message log per key.
#[async_trait]
pub trait ChatHistoryStore: Send + Sync {
    /// Appends one message to the end of the log for `key`.
    async fn append(&self, key: &str, message: ChatMessage) -> Result<()>;

    /// Returns at most `limit` most recent messages for `key`, oldest first.
    async fn recent(&self, key: &str, limit: usize) -> Result<Vec<ChatMessage>>;

    /// Removes every message stored under `key`.
    async fn clear(&self, key: &str) -> Result<()>;
}
