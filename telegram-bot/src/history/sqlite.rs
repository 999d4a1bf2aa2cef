//! SQLite implementation of [`ChatHistoryStore`]. Rows are kept; the window is applied on read.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use prompt::{ChatMessage, MessageRole};
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::ChatHistoryStore;
use crate::core::{BotError, Result};

#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Opens (creating if missing) the database file at `path` and ensures the schema.
    pub async fn new(path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let options = SqliteConnectOptions::new()
            .create_if_missing(true)
            .filename(path);
        let pool = SqlitePool::connect_with(options).await?;
        let store = Self { pool };
        store.init_schema().await?;
        info!(path = %path, "SQLite history store ready");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_history (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                history_key TEXT NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chat_history_key ON chat_history(history_key, seq)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> Result<ChatMessage> {
        let role_str: String = row.try_get("role")?;
        let content: String = row.try_get("content")?;
        let role = MessageRole::parse(&role_str)
            .ok_or_else(|| BotError::Memory(format!("Invalid role in history: {}", role_str)))?;
        Ok(ChatMessage { role, content })
    }
}

#[async_trait]
impl ChatHistoryStore for SqliteHistoryStore {
    async fn append(&self, key: &str, message: ChatMessage) -> Result<()> {
        sqlx::query(
            "INSERT INTO chat_history (id, history_key, role, content, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(key)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        debug!(key = %key, role = message.role.as_str(), "History appended (sqlite)");
        Ok(())
    }

    async fn recent(&self, key: &str, limit: usize) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(
            "SELECT role, content FROM chat_history WHERE history_key = ?1 ORDER BY seq DESC LIMIT ?2",
        )
        .bind(key)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        let mut messages = rows
            .iter()
            .map(Self::row_to_message)
            .collect::<Result<Vec<_>>>()?;
        messages.reverse();
        Ok(messages)
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let done = sqlx::query("DELETE FROM chat_history WHERE history_key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        info!(key = %key, rows = done.rows_affected(), "History cleared (sqlite)");
        Ok(())
    }
}
