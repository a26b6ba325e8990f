//! Configuration loading from disk.
//!
//! # Responsibilities
//! - Read and deserialize a TOML config file
//! - Run semantic validation before the config is accepted
//!
//! # Design Decisions
//! - Loading is fatal at boot; there is no partial acceptance
//! - Validation failures are reported all at once, joined in the message

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::schema::AppConfig;
use super::validation::{validate_config, ValidationError};

/// Error raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(&fs::read_to_string(path)?)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}
