//! Proxy endpoint handlers.
//!
//! # Responsibilities
//! - Validate request payloads field by field (missing fields → 400)
//! - Verify caller identity against the platform customer record (save)
//! - Run the read-merge-write cycle against the document store
//! - Shape success responses (`ok`, `removed`, `empty`, `notFound`)
//!
//! Each handler is a single linear sequence; the only branch points are
//! "document/entry missing" and "validation failed". No state is carried
//! across calls.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::http::error::ProxyError;
use crate::http::server::AppState;
use crate::notes::{remove_entries, upsert_entry, ProductInput, RemoveKey};
use crate::shopify::CustomerId;

/// Product fields as sent by the storefront. Ids arrive as numbers or
/// numeric strings; a non-numeric rating is ignored rather than rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProductPayload {
    #[serde(deserialize_with = "lenient_u64")]
    pub product_id: Option<u64>,
    pub handle: Option<String>,
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SaveRequest {
    pub shop: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub customer_email: Option<String>,
    pub event_handle: Option<String>,
    pub event_name: Option<String>,
    pub product: Option<ProductPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteRequest {
    pub shop: Option<String>,
    pub customer_id: Option<CustomerId>,
    pub event_handle: Option<String>,
    pub event_name: Option<String>,
    pub product: Option<ProductPayload>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub ok: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty: Option<bool>,
    #[serde(rename = "notFound", skip_serializing_if = "Option::is_none")]
    pub not_found: Option<&'static str>,
}

/// `POST /proxy/save` — upsert one tasting entry for a customer.
pub async fn save(
    State(state): State<AppState>,
    payload: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SaveResponse>, ProxyError> {
    let Json(req) = payload.map_err(|_| ProxyError::InvalidJson)?;

    require(req.shop.as_deref(), "shop")?;
    let customer_id = req
        .customer_id
        .ok_or(ProxyError::MissingField("customer_id"))?;
    let email = require(req.customer_email.as_deref(), "customer_email")?;
    let event_handle = require(req.event_handle.as_deref(), "event_handle")?;
    let product = req
        .product
        .ok_or(ProxyError::MissingField("product.product_id"))?;
    // Zero is rejected like an absent id: delete never matches id 0, so a
    // zero-id entry could not be removed again once stored.
    let product_id = match product.product_id {
        Some(id) if id != 0 => id,
        _ => return Err(ProxyError::MissingField("product.product_id")),
    };

    let verified = state
        .store
        .verify_customer(&customer_id, email)
        .await
        .map_err(ProxyError::UpstreamFetch)?;
    if !verified {
        tracing::warn!(customer_id = %customer_id.as_str(), "Customer verification failed");
        return Err(ProxyError::VerificationFailed);
    }

    let mut doc = state
        .store
        .get(&customer_id)
        .await
        .map_err(ProxyError::UpstreamFetch)?
        .unwrap_or_default();

    let input = ProductInput {
        product_id,
        handle: product.handle,
        title: product.title,
        rating: product.rating,
        nose: product.nose,
        palate: product.palate,
        note: product.note,
    };
    upsert_entry(
        &mut doc,
        event_handle,
        req.event_name.as_deref(),
        &input,
        Utc::now(),
    );

    state
        .store
        .put(&customer_id, &doc)
        .await
        .map_err(ProxyError::UpstreamWrite)?;

    tracing::info!(
        customer_id = %customer_id.as_str(),
        event_handle = %event_handle,
        product_id = product_id,
        "Tasting note saved"
    );

    Ok(Json(SaveResponse { ok: true }))
}

/// `POST /proxy/delete` — remove matching entries from one event.
pub async fn delete(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<DeleteResponse>, ProxyError> {
    let Json(req) = payload.map_err(|_| ProxyError::InvalidJson)?;

    require(req.shop.as_deref(), "shop")?;
    let customer_id = req
        .customer_id
        .ok_or(ProxyError::MissingField("customer_id"))?;

    let mut doc = match state
        .store
        .get(&customer_id)
        .await
        .map_err(ProxyError::UpstreamFetch)?
    {
        Some(doc) => doc,
        // No metafield at all: nothing to delete, and no write call.
        None => {
            return Ok(Json(DeleteResponse {
                ok: true,
                empty: Some(true),
                ..Default::default()
            }));
        }
    };

    let event = match (req.event_handle.as_deref(), req.event_name.as_deref()) {
        (Some(handle), _) if !handle.is_empty() => doc.event_by_handle_mut(handle),
        (_, Some(name)) if !name.is_empty() => doc.event_by_name_mut(name),
        _ => None,
    };
    let Some(event) = event else {
        return Ok(Json(DeleteResponse {
            ok: true,
            not_found: Some("event"),
            ..Default::default()
        }));
    };

    let product = req.product.unwrap_or_default();
    let key = RemoveKey {
        product_id: product.product_id,
        handle: product.handle,
    };
    let removed = remove_entries(event, &key);

    // Emptied events stay in place; the document is written back either way.
    state
        .store
        .put(&customer_id, &doc)
        .await
        .map_err(ProxyError::UpstreamWrite)?;

    tracing::info!(
        customer_id = %customer_id.as_str(),
        removed = removed,
        "Tasting note delete applied"
    );

    Ok(Json(DeleteResponse {
        ok: true,
        removed: Some(removed),
        ..Default::default()
    }))
}

/// `GET /proxy/test` — liveness probe.
pub async fn probe() -> Json<Value> {
    Json(serde_json::json!({ "ok": true, "where": "proxy/test" }))
}

fn require<'a>(field: Option<&'a str>, name: &'static str) -> Result<&'a str, ProxyError> {
    match field {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ProxyError::MissingField(name)),
    }
}

/// Accept a u64 from a JSON number or a numeric string; anything else is None.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }))
}

/// Accept a rating only when it is an actual JSON number.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}
