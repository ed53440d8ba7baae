//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment keys read on top of the config file.
pub const ENV_NAME: &str = "NAME";
pub const ENV_PORT: &str = "PORT";
pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable {key} has invalid value '{value}'")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply process
/// environment overrides.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit environment lookup.
pub fn load_config_with<F>(path: &Path, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;
    finish(config, lookup)
}

/// Build configuration from defaults plus process environment overrides.
pub fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    finish(ServiceConfig::default(), |key| std::env::var(key).ok())
}

fn finish<F>(mut config: ServiceConfig, lookup: F) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `NAME`, `PORT`, `SERVER_HOST` and `SERVER_PORT` overrides.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup(ENV_NAME) {
        config.service.name = name;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.service.port = parse_port(ENV_PORT, port)?;
    }
    if let Some(host) = lookup(ENV_SERVER_HOST) {
        config.parent.host = host;
    }
    if let Some(port) = lookup(ENV_SERVER_PORT) {
        config.parent.port = parse_port(ENV_SERVER_PORT, port)?;
    }
    Ok(())
}

fn parse_port(key: &'static str, value: String) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Env { key, value })
}
