//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Storefront request
//!     → server.rs (Axum setup, middleware stack)
//!     → middleware/cors.rs (origin allow-list, preflight)
//!     → handlers.rs (validate, read-merge-write, respond)
//!     → error.rs (failures → {ok:false, error} envelope)
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use error::ProxyError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
