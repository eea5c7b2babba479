//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check value ranges (timeouts > 0, addresses parse)
//! - Returns all validation errors, not just the first

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// One semantic problem found in a config.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("shopify.shop must be set (or SHOPIFY_SHOP)")]
    MissingShop,

    #[error("shopify.admin_token must be set (or SHOPIFY_ADMIN_TOKEN)")]
    MissingAdminToken,

    #[error("shopify.api_version must not be empty")]
    MissingApiVersion,

    #[error("shopify.request_timeout_secs must be greater than zero")]
    ZeroUpstreamTimeout,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("cors.allowed_origins must not be empty")]
    NoAllowedOrigins,

    #[error("observability.metrics_address '{0}' is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Pure semantic validation pass over a parsed config.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.shopify.shop.is_empty() && config.shopify.endpoint.is_none() {
        errors.push(ValidationError::MissingShop);
    }
    if config.shopify.admin_token.is_empty() {
        errors.push(ValidationError::MissingAdminToken);
    }
    if config.shopify.api_version.is_empty() {
        errors.push(ValidationError::MissingApiVersion);
    }
    if config.shopify.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroUpstreamTimeout);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::NoAllowedOrigins);
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
