use anyhow::Result;
use colored::Colorize;
use content_exporter::config::{self, Config};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file {}", config_path.display());

    let cfg = config::load(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  {}: {}", "Target".cyan(), cfg.target.url);
    println!("  {}: {}", "Mime Type".cyan(), cfg.target.mime_type);
    println!("  {}: {}s", "Timeout".cyan(), cfg.target.timeout_seconds);
    println!("  {}: {}:{}", "Server".cyan(), cfg.server.host, cfg.server.port);
    println!(
        "  {}: {}",
        "Basic Auth".cyan(),
        if cfg.basic_auth.is_some() {
            "configured".green()
        } else {
            "not configured".red()
        }
    );
    println!(
        "  {}: {}",
        "Metrics".cyan(),
        if cfg.metrics.enabled {
            cfg.metrics.endpoint.green()
        } else {
            "disabled".red()
        }
    );

    Ok(())
}

/// Sanitize secrets in configuration for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();

    if let Some(auth) = &mut sanitized.basic_auth {
        auth.password = mask_secret(&auth.password);
    }

    sanitized
}

/// Mask a secret for safe display
///
/// Shows first 2 and last 2 characters with an ellipsis in between
/// Example: "correct-horse" -> "co...se"
fn mask_secret(secret: &str) -> String {
    if secret.chars().count() <= 8 {
        // Too short to mask meaningfully
        return "***".to_string();
    }

    let prefix: String = secret.chars().take(2).collect();
    let suffix: String = secret
        .chars()
        .rev()
        .take(2)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    format!("{}...{}", prefix, suffix)
}
