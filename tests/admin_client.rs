//! Tests for the full path through the Admin GraphQL client, using a mock
//! upstream on a loopback port.

use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};

use tasting_proxy::config::AppConfig;
use tasting_proxy::notes::TastingDocument;
use tasting_proxy::shopify::AdminClient;
use tasting_proxy::Shutdown;

mod common;
use common::{start_mock_admin, MockAdminState, TEST_ORIGIN};

const EMAIL: &str = "taster@example.com";

fn config_for(endpoint: &str) -> AppConfig {
    let mut config = common::test_config();
    config.shopify.endpoint = Some(endpoint.to_string());
    config
}

async fn start_proxy_with_admin(config: AppConfig) -> (std::net::SocketAddr, Shutdown) {
    let store = Arc::new(AdminClient::new(&config.shopify).unwrap());
    common::start_proxy(config, store).await
}

fn save_body() -> Value {
    json!({
        "shop": "test-shop.myshopify.com",
        "customer_id": 1001,
        "customer_email": EMAIL,
        "event_handle": "spring-tasting",
        "product": { "product_id": 42, "rating": 4, "nose": "citrus" },
    })
}

#[tokio::test]
async fn save_writes_document_to_metafield() {
    let (endpoint, state) = start_mock_admin(MockAdminState {
        customer_email: Some(EMAIL.to_string()),
        ..Default::default()
    })
    .await;
    let (addr, shutdown) = start_proxy_with_admin(config_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/save", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&save_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));

    let st = state.lock().unwrap();
    assert_eq!(st.writes.len(), 1);
    let doc: TastingDocument = serde_json::from_str(&st.writes[0]).unwrap();
    assert_eq!(doc.events.len(), 1);
    assert_eq!(doc.events[0].collection_handle, "spring-tasting");
    let wine = &doc.events[0].wines[0];
    assert_eq!(wine.product_id, 42);
    assert_eq!(wine.rating, Some(4.0));
    assert_eq!(wine.nose, "citrus");
    assert_eq!(wine.created_at, wine.updated_at);

    shutdown.trigger();
}

#[tokio::test]
async fn save_merges_into_existing_metafield() {
    let existing = json!({
        "events": [{
            "id": "spring-tasting",
            "collection_handle": "spring-tasting",
            "name": "Spring",
            "date": "2025-03-01",
            "wines": [{ "product_id": 7, "title": "Old Vine", "updated_at": "2025-03-01T10:00:00+00:00" }],
        }]
    });
    let (endpoint, state) = start_mock_admin(MockAdminState {
        customer_email: Some(EMAIL.to_string()),
        metafield: Some(existing.to_string()),
        ..Default::default()
    })
    .await;
    let (addr, shutdown) = start_proxy_with_admin(config_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/save", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&save_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let st = state.lock().unwrap();
    let doc: TastingDocument = serde_json::from_str(&st.writes[0]).unwrap();
    // Event reused, both wines present, legacy created_at back-filled.
    assert_eq!(doc.events.len(), 1);
    assert_eq!(doc.events[0].wines.len(), 2);
    let legacy = doc.events[0].wines.iter().find(|w| w.product_id == 7).unwrap();
    assert_eq!(legacy.created_at, "2025-03-01T10:00:00+00:00");

    shutdown.trigger();
}

#[tokio::test]
async fn unknown_customer_fails_verification() {
    let (endpoint, state) = start_mock_admin(MockAdminState::default()).await;
    let (addr, shutdown) = start_proxy_with_admin(config_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/save", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&save_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(state.lock().unwrap().writes.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn verification_accepts_upstream_email_differing_in_case() {
    // The platform record carries mixed case; the storefront sends lowercase.
    let (endpoint, state) = start_mock_admin(MockAdminState {
        customer_email: Some("Taster@Example.COM".to_string()),
        ..Default::default()
    })
    .await;
    let (addr, shutdown) = start_proxy_with_admin(config_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/save", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&save_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.lock().unwrap().writes.len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn write_user_errors_surface_verbatim() {
    let (endpoint, _state) = start_mock_admin(MockAdminState {
        customer_email: Some(EMAIL.to_string()),
        user_errors: vec!["Value is too long".to_string()],
        ..Default::default()
    })
    .await;
    let (addr, shutdown) = start_proxy_with_admin(config_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/save", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&save_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"], json!("Value is too long"));

    shutdown.trigger();
}

#[tokio::test]
async fn malformed_metafield_recovers_to_empty_document() {
    let (endpoint, state) = start_mock_admin(MockAdminState {
        customer_email: Some(EMAIL.to_string()),
        metafield: Some("{{{ not json".to_string()),
        ..Default::default()
    })
    .await;
    let (addr, shutdown) = start_proxy_with_admin(config_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/save", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&save_body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let st = state.lock().unwrap();
    let doc: TastingDocument = serde_json::from_str(&st.writes[0]).unwrap();
    assert_eq!(doc.events.len(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn delete_without_metafield_skips_write() {
    let (endpoint, state) = start_mock_admin(MockAdminState {
        customer_email: Some(EMAIL.to_string()),
        ..Default::default()
    })
    .await;
    let (addr, shutdown) = start_proxy_with_admin(config_for(&endpoint)).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/delete", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&json!({
            "shop": "test-shop.myshopify.com",
            "customer_id": 1001,
            "event_handle": "spring-tasting",
            "product": { "product_id": 42 },
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true, "empty": true }));
    assert!(state.lock().unwrap().writes.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_upstream_maps_to_bad_gateway() {
    // Bind-then-drop to get a port nothing is listening on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let (addr, shutdown) =
        start_proxy_with_admin(config_for(&format!("http://{}/graphql", dead))).await;

    let resp = reqwest::Client::new()
        .post(format!("http://{}/proxy/save", addr))
        .header("Origin", TEST_ORIGIN)
        .json(&save_body())
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], json!(false));

    shutdown.trigger();
}
