//! REPL runner: converts teloxide messages to core::Message and passes them to HandlerChain.

use crate::chain::HandlerChain;
use crate::config::BaseConfig;
use crate::core::{BotError, Result, ToCoreMessage};
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;

/// Creates the teloxide Bot from base config, pointing it at a custom API server when configured.
pub fn build_teloxide_bot(config: &BaseConfig) -> Result<teloxide::Bot> {
    let bot = teloxide::Bot::new(&config.bot_token);
    match config.telegram_api_url {
        Some(ref url) => {
            let url = reqwest::Url::parse(url).map_err(|e| {
                BotError::config(format!("TELEGRAM_API_URL is not a valid URL: {}", e))
            })?;
            info!(api_url = %url, "Using custom Telegram API URL");
            Ok(bot.set_api_url(url))
        }
        None => Ok(bot),
    }
}

/// Starts the REPL. Each message is converted to core::Message and passed to
/// chain.handle in its own task so the REPL never blocks on a slow turn.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot connected");
        }
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            match msg.text() {
                Some(text) => {
                    info!(
                        user_id = core_msg.user.id,
                        chat_id = core_msg.chat.id,
                        message_content = %text,
                        "Received message"
                    );
                }
                None => {
                    info!(
                        user_id = core_msg.user.id,
                        chat_id = core_msg.chat.id,
                        "Received non-text message"
                    );
                }
            }

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(
                        error = %e,
                        user_id = core_msg.user.id,
                        chat_id = core_msg.chat.id,
                        "Handler chain failed"
                    );
                }
            });

            respond(())
        }
    })
    .await;

    Ok(())
}
