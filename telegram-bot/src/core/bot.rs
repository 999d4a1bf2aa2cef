//! Outbound transport trait. Production code sends through Telegram; tests substitute a recording mock.

use async_trait::async_trait;

use super::error::Result;
use super::types::Chat;

/// Delivery side of the bot transport. Failures are reported as [`BotError::Transport`].
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a photo by URL, with optional caption.
    async fn send_photo_url(&self, chat: &Chat, url: &str, caption: Option<&str>) -> Result<()>;

    /// Sends an audio clip (MP3 bytes) as a voice message.
    async fn send_voice(&self, chat: &Chat, audio: Vec<u8>) -> Result<()>;

    /// Shows the "typing…" indicator. Default: no-op.
    async fn send_typing(&self, _chat: &Chat) -> Result<()> {
        Ok(())
    }
}
