//! Configuration loading from disk and environment.
//!
//! # Responsibilities
//! - Parse an optional TOML config file
//! - Apply environment-variable overrides on top (deployment secrets such
//!   as the Admin token are normally supplied this way)
//! - Run semantic validation before the config is accepted

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// Starts from defaults, merges the TOML file when a path is given, then
/// applies environment overrides, then validates.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = fs::read_to_string(p)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Environment variables recognized as overrides.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(shop) = env::var("SHOPIFY_SHOP") {
        config.shopify.shop = shop;
    }
    if let Ok(token) = env::var("SHOPIFY_ADMIN_TOKEN") {
        config.shopify.admin_token = token;
    }
    if let Ok(version) = env::var("SHOPIFY_API_VERSION") {
        config.shopify.api_version = version;
    }
    if let Ok(addr) = env::var("PROXY_BIND_ADDRESS") {
        config.listener.bind_address = addr;
    }
    if let Ok(origins) = env::var("PROXY_ALLOWED_ORIGINS") {
        config.cors.allowed_origins = origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();
    }
}
