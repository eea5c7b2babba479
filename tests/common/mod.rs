//! Shared utilities for integration testing.
#![allow(dead_code)] // not every test binary uses every helper

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use tasting_proxy::config::AppConfig;
use tasting_proxy::notes::TastingDocument;
use tasting_proxy::shopify::{CustomerId, DocumentStore, StoreError};
use tasting_proxy::{HttpServer, Shutdown};

/// Origin the test config allows.
pub const TEST_ORIGIN: &str = "https://test-shop.myshopify.com";

/// State for the mock Admin GraphQL API.
#[derive(Debug, Default)]
pub struct MockAdminState {
    /// Email the platform "knows" for any customer; `None` = customer not found.
    pub customer_email: Option<String>,
    /// Raw metafield value; `None` = metafield does not exist.
    pub metafield: Option<String>,
    /// Every value passed to metafieldsSet, in order.
    pub writes: Vec<String>,
    /// When non-empty, metafieldsSet responds with these userErrors.
    pub user_errors: Vec<String>,
}

/// Start a mock Admin API on a loopback port. Returns the GraphQL endpoint
/// URL and a handle to the shared state.
pub async fn start_mock_admin(state: MockAdminState) -> (String, Arc<Mutex<MockAdminState>>) {
    let shared = Arc::new(Mutex::new(state));
    let app = Router::new()
        .route("/graphql", post(mock_graphql))
        .with_state(shared.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/graphql", addr), shared)
}

async fn mock_graphql(
    State(state): State<Arc<Mutex<MockAdminState>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or("");
    let mut st = state.lock().unwrap();

    if query.contains("metafieldsSet") {
        let value = body["variables"]["value"].as_str().unwrap_or("").to_string();
        st.writes.push(value.clone());
        if st.user_errors.is_empty() {
            st.metafield = Some(value);
            return Json(json!({ "data": { "metafieldsSet": { "userErrors": [] } } }));
        }
        let errors: Vec<Value> = st
            .user_errors
            .iter()
            .map(|m| json!({ "field": ["value"], "message": m }))
            .collect();
        return Json(json!({ "data": { "metafieldsSet": { "userErrors": errors } } }));
    }

    if query.contains("metafield(") {
        let metafield = st.metafield.as_ref().map(|v| {
            json!({ "id": "gid://shopify/Metafield/1", "type": "json", "value": v })
        });
        return Json(json!({ "data": { "customer": { "metafield": metafield } } }));
    }

    // Customer lookup.
    let customer = st
        .customer_email
        .as_ref()
        .map(|email| json!({ "id": body["variables"]["id"], "email": email }));
    Json(json!({ "data": { "customer": customer } }))
}

/// In-memory document store for handler-level tests.
#[derive(Debug)]
pub struct InMemoryStore {
    /// Email returned for every customer.
    pub email: String,
    /// Documents by customer id; a missing key means "no metafield".
    pub docs: Mutex<HashMap<String, TastingDocument>>,
    /// Number of put calls observed.
    pub puts: AtomicUsize,
}

impl InMemoryStore {
    pub fn new(email: &str) -> Self {
        Self {
            email: email.to_string(),
            docs: Mutex::new(HashMap::new()),
            puts: AtomicUsize::new(0),
        }
    }

    pub fn with_document(email: &str, customer_id: &str, doc: TastingDocument) -> Self {
        let store = Self::new(email);
        store
            .docs
            .lock()
            .unwrap()
            .insert(customer_id.to_string(), doc);
        store
    }

    pub fn document(&self, customer_id: &str) -> Option<TastingDocument> {
        self.docs.lock().unwrap().get(customer_id).cloned()
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn verify_customer(
        &self,
        _customer_id: &CustomerId,
        email: &str,
    ) -> Result<bool, StoreError> {
        Ok(self.email.eq_ignore_ascii_case(email))
    }

    async fn get(&self, customer_id: &CustomerId) -> Result<Option<TastingDocument>, StoreError> {
        Ok(self.docs.lock().unwrap().get(customer_id.as_str()).cloned())
    }

    async fn put(
        &self,
        customer_id: &CustomerId,
        doc: &TastingDocument,
    ) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.docs
            .lock()
            .unwrap()
            .insert(customer_id.as_str().to_string(), doc.clone());
        Ok(())
    }
}

/// Test config pointing CORS at [`TEST_ORIGIN`].
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.cors.allowed_origins = vec![TEST_ORIGIN.to_string()];
    config.shopify.shop = "test-shop.myshopify.com".to_string();
    config.shopify.admin_token = "shpat_test".to_string();
    config
}

/// Start the proxy on a loopback port with the given store. The returned
/// [`Shutdown`] handle stops the spawned server.
pub async fn start_proxy(
    config: AppConfig,
    store: Arc<dyn DocumentStore>,
) -> (SocketAddr, Shutdown) {
    let server = HttpServer::with_store(config, store);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });
    (addr, shutdown)
}
