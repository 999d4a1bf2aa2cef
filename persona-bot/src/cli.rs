//! CLI parser.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "persona-bot")]
#[command(about = "Persona chatbot for Telegram", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Telegram bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// List the available personas.
    Personas,
    /// Send one message to the agent locally and print the reply.
    Chat {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        chat_id: i64,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_token() {
        let cli = Cli::try_parse_from(["persona-bot", "run", "--token", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Run { token: Some(ref t) } if t == "abc"));
    }

    #[test]
    fn test_parse_chat() {
        let cli =
            Cli::try_parse_from(["persona-bot", "chat", "--chat-id", "-42", "hello there"]).unwrap();
        match cli.command {
            Commands::Chat { chat_id, message } => {
                assert_eq!(chat_id, -42);
                assert_eq!(message, "hello there");
            }
            _ => panic!("expected chat command"),
        }
    }
}
