use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::core::{Handler, HandlerError, Message, Result};

/// Stops the chain with `Unauthorized` when the chat is not in the allow-list.
/// An empty list lets every chat through.
pub struct AllowListHandler {
    allowed_chats: Vec<i64>,
}

impl AllowListHandler {
    pub fn new(allowed_chats: Vec<i64>) -> Self {
        Self { allowed_chats }
    }

    pub fn is_allowed(&self, chat_id: i64) -> bool {
        self.allowed_chats.is_empty() || self.allowed_chats.contains(&chat_id)
    }
}

#[async_trait]
impl Handler for AllowListHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let chat_id = message.chat.id;
        if self.is_allowed(chat_id) {
            info!(chat_id = chat_id, "Chat authorized");
            Ok(true)
        } else {
            warn!(chat_id = chat_id, user_id = message.user.id, "Message from chat outside allow-list");
            Err(HandlerError::Unauthorized(chat_id).into())
        }
    }
}
