//! Agent handler: runs one agent turn per chat message and delivers text, images and voice.

use std::sync::Arc;

use async_trait::async_trait;
use telegram_bot::{Bot as CoreBot, BotError, Handler, HandlerResponse, Message, Result};
use tracing::{error, info, instrument, warn};

use crate::agent::{AgentFactory, AgentReply};
use crate::locks::ChatLocks;
use crate::tools::SpeechTool;

// --- User-facing fallback messages (sent to Telegram on errors) ---
pub const MSG_REQUEST_FAILED: &str =
    "Sorry, something went wrong processing your request. Please try again later.";
pub const MSG_SEND_FAILED: &str = "Sorry, something went wrong while sending the reply.";
pub const MSG_MEMORY_CLEARED: &str = "Okay, let's start over. I've forgotten our conversation.";

/// Terminal handler of the chain. Turns of the same chat are serialized.
#[derive(Clone)]
pub struct AgentHandler {
    factory: AgentFactory,
    bot: Arc<dyn CoreBot>,
    voice: Option<SpeechTool>,
    locks: ChatLocks,
}

impl AgentHandler {
    pub fn new(factory: AgentFactory, bot: Arc<dyn CoreBot>) -> Self {
        let voice = factory.voice_tool();
        Self {
            factory,
            bot,
            voice,
            locks: ChatLocks::new(),
        }
    }

    /// Replaces the voice tool (e.g. one pointed at a mock server).
    pub fn with_voice(mut self, voice: Option<SpeechTool>) -> Self {
        self.voice = voice;
        self
    }

    pub fn has_voice(&self) -> bool {
        self.voice.is_some()
    }

    pub fn greeting(&self) -> String {
        let profile = self.factory.config().persona.profile();
        format!("Hi, I'm {}! {}", profile.name, profile.byline)
    }

    fn log_error_chain(e: &BotError, first_msg: &str) {
        error!(error = %e, "{}", first_msg);
        let mut source = std::error::Error::source(e);
        while let Some(cause) = source {
            error!(cause = %cause, "Caused by");
            source = std::error::Error::source(cause);
        }
    }

    async fn send_fallback_and_stop(&self, message: &Message, text: &str) -> Result<HandlerResponse> {
        if let Err(e) = self.bot.send_message(&message.chat, text).await {
            error!(error = %e, chat_id = message.chat.id, "Failed to send fallback message");
        }
        Ok(HandlerResponse::Stop)
    }

    async fn reset(&self, message: &Message) -> Result<HandlerResponse> {
        let _turn = self.locks.acquire(message.chat.id).await;
        let chat_id = message.chat.id.to_string();
        self.factory.memory().get_memory(&chat_id).clear().await?;
        info!(chat_id = message.chat.id, "Conversation memory cleared");
        self.bot.send_message(&message.chat, MSG_MEMORY_CLEARED).await?;
        Ok(HandlerResponse::Reply(MSG_MEMORY_CLEARED.to_string()))
    }

    async fn deliver(&self, message: &Message, reply: &AgentReply) -> Result<()> {
        if !reply.text.is_empty() {
            self.bot.send_message(&message.chat, &reply.text).await?;
        }
        for url in &reply.image_urls {
            if let Err(e) = self.bot.send_photo_url(&message.chat, url, None).await {
                warn!(error = %e, chat_id = message.chat.id, url = %url, "Failed to send image");
            }
        }
        if let Some(voice) = &self.voice {
            match voice.synthesize(&reply.text).await {
                Ok(audio) => {
                    if let Err(e) = self.bot.send_voice(&message.chat, audio).await {
                        warn!(error = %e, chat_id = message.chat.id, "Failed to send voice note");
                    }
                }
                Err(e) => {
                    let err = e.into_bot_error(voice.name());
                    warn!(error = %err, chat_id = message.chat.id, "Voice synthesis failed");
                }
            }
        }
        Ok(())
    }

    async fn run_turn(&self, message: &Message) -> Result<HandlerResponse> {
        let _turn = self.locks.acquire(message.chat.id).await;
        if let Err(e) = self.bot.send_typing(&message.chat).await {
            warn!(error = %e, chat_id = message.chat.id, "Failed to send typing action");
        }

        let chat_id = message.chat.id.to_string();
        let result = match self.factory.build_agent(&chat_id) {
            Ok(agent) => agent.run(&message.content).await,
            Err(e) => Err(e),
        };
        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                Self::log_error_chain(&e, "Agent turn failed");
                if matches!(e, BotError::Llm(ref m) if m.contains("401")) {
                    error!("Hint: 401 usually means OPENAI_API_KEY is invalid or does not match OPENAI_BASE_URL");
                }
                return self.send_fallback_and_stop(message, MSG_REQUEST_FAILED).await;
            }
        };

        if let Err(e) = self.deliver(message, &reply).await {
            Self::log_error_chain(&e, "Failed to deliver reply");
            return self.send_fallback_and_stop(message, MSG_SEND_FAILED).await;
        }
        Ok(HandlerResponse::Reply(reply.text))
    }
}

#[async_trait]
impl Handler for AgentHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.content.trim().is_empty() {
            info!(chat_id = message.chat.id, "step: AgentHandler no text, skip");
            return Ok(HandlerResponse::Continue);
        }
        if message.is_command("start") {
            let greeting = self.greeting();
            self.bot.send_message(&message.chat, &greeting).await?;
            return Ok(HandlerResponse::Reply(greeting));
        }
        if message.is_command("reset") {
            return self.reset(message).await;
        }

        info!(
            chat_id = message.chat.id,
            user_id = message.user.id,
            "step: AgentHandler turn start"
        );
        self.run_turn(message).await
    }
}
