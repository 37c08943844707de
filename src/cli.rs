use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "content-exporter", version, about = "Content exporter")]
pub struct Cli {
    /// Configuration file path (.toml or .json)
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the exporter server (default)
    Start,

    /// Fetch the configured target once and print the body
    Fetch {
        /// Override the target URL
        #[arg(short, long)]
        url: Option<String>,

        /// Override the accepted mime-type token
        #[arg(short, long)]
        mime_type: Option<String>,

        /// Override the timeout in seconds
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display current configuration (with secrets masked)
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }
}
