//! persona-bot: entry point.

use anyhow::Result;
use clap::Parser;
use persona_bot::cli::{Cli, Commands};
use persona_bot::{run_bot, run_local_turn, Persona, PersonaBotConfig};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = PersonaBotConfig::load(token)?;
            run_bot(config).await
        }
        Commands::Personas => {
            for persona in Persona::ALL {
                println!("{:<6} {}", persona.id(), persona.profile().byline);
            }
            Ok(())
        }
        Commands::Chat { chat_id, message } => {
            let config = PersonaBotConfig::from_env()?;
            telegram_bot::init_tracing(&config.base.log_file)?;
            let reply = run_local_turn(config, &chat_id.to_string(), &message).await?;
            println!("{}", reply.text);
            for url in reply.image_urls {
                println!("[image] {}", url);
            }
            Ok(())
        }
    }
}
