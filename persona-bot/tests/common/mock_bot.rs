//! Mock implementation of [`telegram_bot::Bot`] for integration tests.
//!
//! Records every outbound call so tests can assert on what would have reached Telegram.

use async_trait::async_trait;
use std::sync::Arc;
use telegram_bot::{Bot, BotError, Chat, Result};
use tokio::sync::mpsc;

/// One recorded outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Photo { chat_id: i64, url: String },
    Voice { chat_id: i64, bytes: usize },
    Typing { chat_id: i64 },
}

/// Mock Bot that forwards each call as a [`Sent`] record. With `fail_text`, text sends fail.
pub struct MockBot {
    tx: mpsc::UnboundedSender<Sent>,
    fail_text: bool,
}

impl MockBot {
    pub fn with_receiver() -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx, fail_text: false }), rx)
    }

    pub fn failing_text() -> (Arc<Self>, mpsc::UnboundedReceiver<Sent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx, fail_text: true }), rx)
    }
}

/// Everything recorded so far, typing indicators left out.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Sent>) -> Vec<Sent> {
    let mut out = Vec::new();
    while let Ok(record) = rx.try_recv() {
        if !matches!(record, Sent::Typing { .. }) {
            out.push(record);
        }
    }
    out
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        if self.fail_text {
            return Err(BotError::Transport("bot was blocked by the user".to_string()));
        }
        let _ = self.tx.send(Sent::Text {
            chat_id: chat.id,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_photo_url(&self, chat: &Chat, url: &str, _caption: Option<&str>) -> Result<()> {
        let _ = self.tx.send(Sent::Photo {
            chat_id: chat.id,
            url: url.to_string(),
        });
        Ok(())
    }

    async fn send_voice(&self, chat: &Chat, audio: Vec<u8>) -> Result<()> {
        let _ = self.tx.send(Sent::Voice {
            chat_id: chat.id,
            bytes: audio.len(),
        });
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        let _ = self.tx.send(Sent::Typing { chat_id: chat.id });
        Ok(())
    }
}
