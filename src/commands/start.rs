use anyhow::{Context, Result};
use colored::Colorize;
use content_exporter::{config, init_tracing, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// A configuration that fails to load is fatal; the server never starts
/// without one.
pub async fn execute(config_path: &Path) -> Result<()> {
    println!("{}", "Starting content exporter...".green());

    let cfg = config::load(config_path)
        .with_context(|| format!("Cannot start with configuration {}", config_path.display()))?;

    init_tracing(&cfg.server.log_level);
    info!("Configuration loaded from {}", config_path.display());

    // Blocks until shutdown
    server::start_server(cfg).await?;

    Ok(())
}
