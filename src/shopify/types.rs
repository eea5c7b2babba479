//! Upstream-facing types and error definitions.

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors that can occur talking to the upstream document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with GraphQL-level errors or a non-success status.
    #[error("upstream error: {0}")]
    GraphQl(String),

    /// The metafield write was rejected with field-level userErrors.
    #[error("{0}")]
    UserErrors(String),

    /// The configured endpoint is not a valid URL.
    #[error("invalid upstream endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Customer identifier as sent by the storefront. Browsers send it either as
/// a JSON number or a string; both normalize to the string form used in the
/// upstream GID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerId(pub String);

impl CustomerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The Admin API global ID for this customer.
    pub fn gid(&self) -> String {
        format!("gid://shopify/Customer/{}", self.0)
    }
}

impl<'de> Deserialize<'de> for CustomerId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u64),
            Str(String),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Num(n) => CustomerId(n.to_string()),
            Repr::Str(s) => CustomerId(s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_id_accepts_number_or_string() {
        let id: CustomerId = serde_json::from_str("12345").unwrap();
        assert_eq!(id.as_str(), "12345");

        let id: CustomerId = serde_json::from_str(r#""12345""#).unwrap();
        assert_eq!(id.as_str(), "12345");
    }

    #[test]
    fn gid_format() {
        let id = CustomerId("777".into());
        assert_eq!(id.gid(), "gid://shopify/Customer/777");
    }
}
