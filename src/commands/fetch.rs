use anyhow::{Context, Result};
use colored::Colorize;
use content_exporter::{
    config::{self, TargetConfig},
    fetcher::{FetchRequest, Fetcher},
};
use std::io::Write;
use std::path::Path;

/// Execute the fetch command
///
/// Values from the configuration file are overridden by any flag given.
/// When every flag is given the configuration file is not read at all.
pub async fn execute(
    config_path: &Path,
    url: Option<String>,
    mime_type: Option<String>,
    timeout: Option<u64>,
) -> Result<()> {
    let target = resolve_target(config_path, url, mime_type, timeout)?;

    let request = FetchRequest::new(&target.url, &target.mime_type, target.timeout_seconds)
        .context("Invalid fetch parameters")?;

    eprintln!(
        "{} {} (accept '{}', timeout {}s)",
        "Fetching".yellow(),
        request.url(),
        request.mime_type(),
        request.timeout().as_secs()
    );

    let fetcher = Fetcher::new()?;
    match fetcher.fetch(&request).await {
        Ok(content) => {
            eprintln!(
                "{} {} bytes of '{}'",
                "✓ Received".green(),
                content.body.len(),
                content.mime_type
            );
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content.body)?;
            stdout.flush()?;
            Ok(())
        }
        Err(e) => {
            let kind = e.kind();
            Err(e).with_context(|| format!("Fetch failed [{}]", kind))
        }
    }
}

fn resolve_target(
    config_path: &Path,
    url: Option<String>,
    mime_type: Option<String>,
    timeout: Option<u64>,
) -> Result<TargetConfig> {
    if let (Some(url), Some(mime_type), Some(timeout_seconds)) = (&url, &mime_type, timeout) {
        return Ok(TargetConfig {
            url: url.clone(),
            mime_type: mime_type.clone(),
            timeout_seconds,
        });
    }

    let cfg = config::load(config_path)?;
    Ok(override_target(cfg.target, url, mime_type, timeout))
}

fn override_target(
    mut target: TargetConfig,
    url: Option<String>,
    mime_type: Option<String>,
    timeout: Option<u64>,
) -> TargetConfig {
    if let Some(url) = url {
        target.url = url;
    }
    if let Some(mime_type) = mime_type {
        target.mime_type = mime_type;
    }
    if let Some(timeout) = timeout {
        target.timeout_seconds = timeout;
    }
    target
}
