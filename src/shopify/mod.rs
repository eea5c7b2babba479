//! Upstream document storage via the Shopify Admin API.
//!
//! # Data Flow
//! ```text
//! Handler
//!     → store.rs (DocumentStore capability: verify / get / put)
//!     → client.rs (Admin GraphQL requests over HTTPS)
//!     → customer metafield `tasting.events` (opaque JSON blob)
//! ```
//!
//! # Design Decisions
//! - Handlers depend on the `DocumentStore` trait, never on the client
//!   directly, so tests swap in an in-memory store
//! - The whole document is the unit of storage: read in full, written in
//!   full, last writer wins (no compare-and-swap upstream)
//! - Upstream failures abort the request; no retries

pub mod client;
pub mod store;
pub mod types;

pub use client::AdminClient;
pub use store::{DocumentStore, METAFIELD_KEY, METAFIELD_NAMESPACE};
pub use types::{CustomerId, StoreError};
