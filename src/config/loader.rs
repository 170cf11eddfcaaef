//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables that override file values.
pub const ENV_API_KEY: &str = "MCP_API_KEY";
pub const ENV_BASE_URL: &str = "MCP_API_BASE_URL";
pub const ENV_SPEC_PATH: &str = "MCP_API_SPEC_PATH";
pub const ENV_SPEC_FILE_NAME: &str = "MCP_API_SPEC_FILE_NAME";
pub const ENV_BIND_ADDRESS: &str = "MCP_BIND_ADDRESS";

/// Parse a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };

    apply_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply overrides from a key lookup (the process environment in production).
pub fn apply_overrides<F>(config: &mut RelayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_API_KEY) {
        config.auth.api_key = v;
    }
    if let Some(v) = lookup(ENV_BASE_URL) {
        config.downstream.base_url = v;
    }
    if let Some(v) = lookup(ENV_SPEC_PATH) {
        config.api_spec.path = v;
    }
    if let Some(v) = lookup(ENV_SPEC_FILE_NAME) {
        config.api_spec.file_name = v;
    }
    if let Some(v) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = v;
    }
}
