//! Wraps teloxide::Bot and implements [`crate::core::Bot`].

use crate::core::{Bot as CoreBot, BotError, Chat, Result};
use async_trait::async_trait;
use teloxide::{
    payloads::SendPhotoSetters,
    prelude::*,
    types::{ChatAction, ChatId, InputFile},
};
use tracing::debug;

/// Thin wrapper around teloxide::Bot that implements core's Bot trait.
#[derive(Clone)]
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn transport(e: teloxide::RequestError) -> BotError {
    BotError::Transport(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), text.to_string())
            .await
            .map_err(transport)?;
        Ok(())
    }

    async fn send_photo_url(&self, chat: &Chat, url: &str, caption: Option<&str>) -> Result<()> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| BotError::Transport(format!("Invalid photo url {}: {}", url, e)))?;
        let mut request = self.bot.send_photo(ChatId(chat.id), InputFile::url(parsed));
        if let Some(caption) = caption {
            request = request.caption(caption.to_string());
        }
        request.await.map_err(transport)?;
        debug!(chat_id = chat.id, url = %url, "Photo sent");
        Ok(())
    }

    async fn send_voice(&self, chat: &Chat, audio: Vec<u8>) -> Result<()> {
        let size = audio.len();
        self.bot
            .send_voice(ChatId(chat.id), InputFile::memory(audio).file_name("reply.mp3"))
            .await
            .map_err(transport)?;
        debug!(chat_id = chat.id, bytes = size, "Voice note sent");
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
            .map_err(transport)?;
        Ok(())
    }
}
