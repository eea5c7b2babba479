//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files and
//! carry defaults so a minimal config (or none at all) works.

use serde::{Deserialize, Serialize};

/// Root configuration for the tasting-notes proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Storefront origins allowed to call the proxy endpoints.
    pub cors: CorsConfig,

    /// Upstream Admin API settings.
    pub shopify: ShopifyConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Origin allow-list for the browser-facing endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origins allowed on `/proxy/save` and `/proxy/delete`.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "https://famelia-wine.myshopify.com".to_string(),
                "https://famelia.com.au".to_string(),
                "https://www.famelia.com.au".to_string(),
            ],
        }
    }
}

/// Upstream Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShopifyConfig {
    /// Shop domain (e.g., "famelia-wine.myshopify.com").
    pub shop: String,

    /// Admin API access token ("shpat_...").
    pub admin_token: String,

    /// Admin API version segment.
    pub api_version: String,

    /// Per-request timeout for upstream calls, in seconds.
    pub request_timeout_secs: u64,

    /// Explicit GraphQL endpoint override. When set, used verbatim instead
    /// of the URL derived from `shop` and `api_version` (tests, staging).
    pub endpoint: Option<String>,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            shop: String::new(),
            admin_token: String::new(),
            api_version: "2024-10".to_string(),
            request_timeout_secs: 10,
            endpoint: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// End-to-end request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let config = AppConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.shopify.api_version, "2024-10");
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn minimal_toml_parses_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [shopify]
            shop = "example.myshopify.com"
            admin_token = "shpat_x"

            [cors]
            allowed_origins = ["https://example.myshopify.com"]
            "#,
        )
        .unwrap();
        assert_eq!(config.shopify.shop, "example.myshopify.com");
        assert_eq!(config.shopify.request_timeout_secs, 10);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.cors.allowed_origins.len(), 1);
    }
}
