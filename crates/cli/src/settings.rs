use std::path::Path;

use config::{Config, Environment, File};
use portfolio_health_core::models::settings::ReportSettings;
use serde::Deserialize;
use thiserror::Error;

/// Prefix for environment overrides, e.g. `PORTFOLIO_HEALTH__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "PORTFOLIO_HEALTH";

/// Config file looked up in the working directory when `--config` is not given.
const DEFAULT_CONFIG_NAME: &str = "portfolio-health";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub report: ReportSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: portfolio_health_web::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load settings: built-in defaults, then the config file, then environment
/// variables.
///
/// An explicit `path` must exist; otherwise `portfolio-health.toml` in the
/// working directory is used if present.
pub fn load(path: Option<&Path>) -> Result<AppConfig, SettingsError> {
    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
    };

    let config = Config::builder()
        .add_source(file)
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize::<AppConfig>()?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), SettingsError> {
    if config.server.max_upload_bytes == 0 {
        return Err(SettingsError::Validation(
            "server.max_upload_bytes must be greater than zero".to_string(),
        ));
    }
    if config.report.output_dir.trim().is_empty() {
        return Err(SettingsError::Validation(
            "report.output_dir must not be empty".to_string(),
        ));
    }
    Ok(())
}
