//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the proxy endpoints
//! - Wire up middleware (origin gate, timeout, request ID, tracing, metrics)
//! - Bind the server to a listener and serve until shutdown

use axum::body::Body;
use axum::http::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::middleware::{origin_gate, CorsState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::observability::metrics;
use crate::shopify::{AdminClient, DocumentStore, StoreError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
}

/// HTTP server for the tasting-notes proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a server backed by the Admin API client.
    pub fn new(config: AppConfig) -> Result<Self, StoreError> {
        let store: Arc<dyn DocumentStore> = Arc::new(AdminClient::new(&config.shopify)?);
        Ok(Self::with_store(config, store))
    }

    /// Create a server with an explicit document store (test seam).
    pub fn with_store(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            store,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let cors = CorsState::new(&config.cors.allowed_origins);

        // Mutation routes sit behind the origin gate; the probe stays open
        // so platform health checks need no Origin header.
        let guarded = Router::new()
            .route("/proxy/save", post(handlers::save))
            .route("/proxy/delete", post(handlers::delete))
            .layer(middleware::from_fn_with_state(cors, origin_gate));

        Router::new()
            .merge(guarded)
            .route("/proxy/test", get(handlers::probe))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
            .layer(middleware::from_fn(track_metrics))
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown channel fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Take the router (for in-process testing without a socket).
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Record per-request counters and latency.
async fn track_metrics(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    metrics::record_request(&method, response.status().as_u16(), &path, start);
    response
}
