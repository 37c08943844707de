use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::fetcher::{FetchRequest, RequestError};

/// Environment variables with this prefix override file values,
/// e.g. `CONTENT_EXPORTER__TARGET__TIMEOUT_SECONDS=5`
pub const ENV_PREFIX: &str = "CONTENT_EXPORTER";

/// Paths served by the content writers; the metrics endpoint may not shadow them
pub const CONTENT_ROUTES: [&str; 4] = [
    "/jsonNoBasicAuth",
    "/jsonBasicAuth",
    "/htmlNoBasicAuth",
    "/htmlBasicAuth",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration: Could not read file \"{path}\": {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration: Could not load configuration: {0}")]
    Conversion(String),

    #[error("Configuration: Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub target: TargetConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_auth: Option<BasicAuthConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Upstream endpoint polled by the fetcher
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub url: String,
    pub mime_type: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9184,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BasicAuthConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub endpoint: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "/metrics".to_string(),
        }
    }
}

impl Config {
    /// Fetch parameters for the configured target
    pub fn fetch_request(&self) -> Result<FetchRequest, RequestError> {
        FetchRequest::new(
            &self.target.url,
            &self.target.mime_type,
            self.target.timeout_seconds,
        )
    }
}

/// On-disk encoding of a configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// `.json` files are JSON, everything else is TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

impl From<Format> for config::FileFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Toml => config::FileFormat::Toml,
            Format::Json => config::FileFormat::Json,
        }
    }
}

/// Load and validate the configuration file at `path`
///
/// Nothing is returned unless the file was read, decoded and validated.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();

    let bytes = std::fs::read(path).map_err(|source| ConfigError::ReadFile {
        path: path.display().to_string(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|e| {
        ConfigError::Conversion(format!("{} is not valid UTF-8: {}", path.display(), e))
    })?;

    let cfg = parse(&content, Format::from_path(path))?;
    validate_config(&cfg)?;

    Ok(cfg)
}

/// Decode configuration text, applying environment overrides
pub fn parse(content: &str, format: Format) -> Result<Config, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::from(format)))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .map_err(|e| ConfigError::Conversion(e.to_string()))?;

    settings
        .try_deserialize()
        .map_err(|e| ConfigError::Conversion(e.to_string()))
}

fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    cfg.fetch_request()
        .map_err(|e| ConfigError::Invalid(format!("target: {}", e)))?;

    if let Some(auth) = &cfg.basic_auth {
        if auth.username.is_empty() {
            return Err(ConfigError::Invalid(
                "basic_auth.username cannot be empty".to_string(),
            ));
        }
    }

    if cfg.metrics.enabled {
        let endpoint = cfg.metrics.endpoint.as_str();
        if !endpoint.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "metrics.endpoint must start with '/': {}",
                endpoint
            )));
        }
        if CONTENT_ROUTES.contains(&endpoint) || endpoint == "/health" {
            return Err(ConfigError::Invalid(format!(
                "metrics.endpoint collides with a built-in route: {}",
                endpoint
            )));
        }
    }

    // Fail early on a host that cannot be bound
    cfg.server
        .host
        .parse::<std::net::IpAddr>()
        .map_err(|e| ConfigError::Invalid(format!("server.host '{}': {}", cfg.server.host, e)))?;

    Ok(())
}
