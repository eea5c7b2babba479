//! Admin GraphQL client with timeout and error handling.
//!
//! # Responsibilities
//! - Build the Admin API endpoint from shop domain and API version
//! - Issue GraphQL queries/mutations with the access-token header
//! - Map transport, GraphQL and userError failures onto `StoreError`

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use url::Url;

use crate::config::schema::ShopifyConfig;
use crate::notes::TastingDocument;
use crate::shopify::store::{DocumentStore, METAFIELD_KEY, METAFIELD_NAMESPACE};
use crate::shopify::types::{CustomerId, StoreError};

const CUSTOMER_QUERY: &str = "query($id: ID!) { customer(id: $id) { id email } }";

const METAFIELD_QUERY: &str = r#"
query($id: ID!, $namespace: String!, $key: String!) {
  customer(id: $id) {
    metafield(namespace: $namespace, key: $key) { id type value }
  }
}
"#;

const METAFIELD_SET_MUTATION: &str = r#"
mutation($ownerId: ID!, $namespace: String!, $key: String!, $value: String!) {
  metafieldsSet(metafields: [{
    ownerId: $ownerId,
    namespace: $namespace,
    key: $key,
    type: "json",
    value: $value
  }]) {
    userErrors { field message }
  }
}
"#;

/// Client for the Shopify Admin GraphQL API.
#[derive(Clone)]
pub struct AdminClient {
    http: reqwest::Client,
    endpoint: Url,
    token: String,
}

impl AdminClient {
    /// Create a client from configuration.
    pub fn new(config: &ShopifyConfig) -> Result<Self, StoreError> {
        let endpoint = match &config.endpoint {
            Some(explicit) => Url::parse(explicit)?,
            None => Url::parse(&format!(
                "https://{}/admin/api/{}/graphql.json",
                config.shop, config.api_version
            ))?,
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            token: config.admin_token.clone(),
        })
    }

    /// Execute one GraphQL request and return the `data` payload.
    async fn graphql(&self, query: &str, variables: Value) -> Result<Value, StoreError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .header("X-Shopify-Access-Token", &self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let mut body: Value = response.json().await?;

        let has_errors = body
            .get("errors")
            .is_some_and(|e| !e.is_null() && e.as_array().map_or(true, |a| !a.is_empty()));
        if !status.is_success() || has_errors {
            let detail = body.get("errors").unwrap_or(&body).to_string();
            tracing::warn!(status = %status, detail = %detail, "Admin API request failed");
            return Err(StoreError::GraphQl(detail));
        }

        Ok(body
            .get_mut("data")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

#[async_trait]
impl DocumentStore for AdminClient {
    async fn verify_customer(
        &self,
        customer_id: &CustomerId,
        email: &str,
    ) -> Result<bool, StoreError> {
        let data = self
            .graphql(CUSTOMER_QUERY, json!({ "id": customer_id.gid() }))
            .await?;
        let real_email = data.pointer("/customer/email").and_then(Value::as_str);
        Ok(matches!(real_email, Some(r) if r.eq_ignore_ascii_case(email)))
    }

    async fn get(&self, customer_id: &CustomerId) -> Result<Option<TastingDocument>, StoreError> {
        let data = self
            .graphql(
                METAFIELD_QUERY,
                json!({
                    "id": customer_id.gid(),
                    "namespace": METAFIELD_NAMESPACE,
                    "key": METAFIELD_KEY,
                }),
            )
            .await?;

        let metafield = data.pointer("/customer/metafield");
        match metafield {
            None => Ok(None),
            Some(v) if v.is_null() => Ok(None),
            Some(mf) => {
                let doc = match mf.get("value").and_then(Value::as_str) {
                    Some(raw) => TastingDocument::from_metafield_value(raw),
                    None => TastingDocument::default(),
                };
                Ok(Some(doc))
            }
        }
    }

    async fn put(
        &self,
        customer_id: &CustomerId,
        doc: &TastingDocument,
    ) -> Result<(), StoreError> {
        let value = serde_json::to_string(doc)
            .map_err(|e| StoreError::GraphQl(format!("document serialization failed: {e}")))?;

        let data = self
            .graphql(
                METAFIELD_SET_MUTATION,
                json!({
                    "ownerId": customer_id.gid(),
                    "namespace": METAFIELD_NAMESPACE,
                    "key": METAFIELD_KEY,
                    "value": value,
                }),
            )
            .await?;

        let user_errors = data
            .pointer("/metafieldsSet/userErrors")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if !user_errors.is_empty() {
            let joined = user_errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(StoreError::UserErrors(joined));
        }

        Ok(())
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token deliberately omitted.
        f.debug_struct("AdminClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}
