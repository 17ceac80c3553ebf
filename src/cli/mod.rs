//! Command-line interface parsing and handling
//!
//! Parses arguments, resolves settings from the config file and flags, sets
//! up logging, and dispatches to the chat UI or the model listing.

pub mod model_list;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::model_list::list_models;
use crate::core::config::{Config, Settings, SettingsOverrides};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging;

#[derive(Parser, Debug)]
#[command(name = "parley", version)]
#[command(about = "A terminal chat client for a local Ollama model server")]
#[command(
    long_about = "parley is a full-screen terminal chat client for a locally running \
Ollama server. Replies stream in as they are generated and the last ten turns \
are kept as context.\n\n\
Controls:\n\
  Enter             Send the message\n\
  Up/Down/PgUp/PgDn Scroll the conversation\n\
  Ctrl+Home/End     Jump to the top or bottom\n\
  Ctrl+U            Clear the input line\n\
  Ctrl+T            Toggle markdown rendering\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /models           List the models installed on the server\n\
  /model <name>     Switch to another installed model\n\
  /system <prompt>  Replace the system prompt\n\
  /clear            Forget the conversation, keep the system prompt\n\
  /reconnect        Probe the server again\n\
  /help             Show commands and keys\n\
  quit, exit        Leave parley"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the model server
    #[arg(short = 's', long, global = true, value_name = "URL")]
    pub server_url: Option<String>,

    /// Model to chat with
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// System prompt for the session
    #[arg(long, global = true, value_name = "PROMPT")]
    pub system: Option<String>,

    /// Write diagnostics to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List the models installed on the server and exit
    Models,
}

impl Args {
    fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides {
            server_url: self.server_url.clone(),
            model: self.model.clone(),
            system_prompt: self.system.clone(),
            log_file: self.log.clone(),
        }
    }

    /// Merge the config file with the flags given on the command line.
    pub fn resolve_settings(&self) -> Result<Settings, Box<dyn Error>> {
        let config = Config::load(self.config.as_deref())?;
        Ok(config.resolve(self.overrides()))
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let settings = args.resolve_settings()?;
    logging::init(settings.log_file.as_deref())?;

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(settings).await,
        Commands::Models => list_models(&settings).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn chat_is_the_default_command() {
        let args = Args::try_parse_from(["parley"]).expect("parse");
        assert_eq!(args.command, None);

        let args = Args::try_parse_from(["parley", "models", "-s", "http://gpu:11434"])
            .expect("parse");
        assert_eq!(args.command, Some(Commands::Models));
        assert_eq!(args.server_url.as_deref(), Some("http://gpu:11434"));
    }

    #[test]
    fn flags_override_config_file() {
        let dir = TempDir::new().expect("tempdir");
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "model = \"from-file\"\nserver_url = \"http://file:11434\"\n",
        )
        .expect("write config");

        let args = Args::try_parse_from([
            "parley",
            "--config",
            config_path.to_str().expect("utf-8 path"),
            "--model",
            "llama3:8b",
            "--system",
            "Be brief.",
        ])
        .expect("parse");
        let settings = args.resolve_settings().expect("settings");

        assert_eq!(settings.model, "llama3:8b");
        assert_eq!(settings.server_url, "http://file:11434");
        assert_eq!(settings.system_prompt, "Be brief.");
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["parley", "serve"]).is_err());
    }
}
