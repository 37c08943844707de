use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use content_exporter::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // `start` initializes tracing itself once the configured level is known
    let command = args.get_command();
    if !matches!(command, cli::Commands::Start) {
        init_tracing("warn");
    }

    match command {
        cli::Commands::Start => {
            commands::start::execute(&args.config).await?;
        }
        cli::Commands::Fetch {
            url,
            mime_type,
            timeout,
        } => {
            commands::fetch::execute(&args.config, url, mime_type, timeout).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config)?,
            cli::ConfigCommands::Validate => commands::config::validate(&args.config)?,
        },
        cli::Commands::Version => {
            println!("Content Exporter v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
