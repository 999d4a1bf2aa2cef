//! Inbound message type for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// A single inbound message: chat identifier plus text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    pub content: String,
    pub message_type: String,
    pub created_at: DateTime<Utc>,
    pub reply_to_message_id: Option<String>,
}

impl Message {
    /// Incoming text message in a private chat; used by the local CLI and tests.
    pub fn incoming_text(chat_id: i64, user: User, content: impl Into<String>) -> Self {
        Self {
            id: format!("local-{}", Utc::now().timestamp_millis()),
            user,
            chat: Chat::private(chat_id),
            content: content.into(),
            message_type: "text".to_string(),
            created_at: Utc::now(),
            reply_to_message_id: None,
        }
    }

    /// True when the content is the bot command `/name` (optionally `/name@botname` or with arguments).
    pub fn is_command(&self, name: &str) -> bool {
        let first = self.content.split_whitespace().next().unwrap_or("");
        let Some(cmd) = first.strip_prefix('/') else {
            return false;
        };
        let cmd = cmd.split('@').next().unwrap_or("");
        cmd.eq_ignore_ascii_case(name)
    }
}
