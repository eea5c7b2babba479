//! Tasting-Notes Proxy
//!
//! A small HTTP proxy that lets a storefront front end persist and remove
//! per-customer tasting-note records, using the platform's customer
//! metafield storage as the backing store.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │               TASTING PROXY                    │
//!                    │                                                │
//!  Storefront  ──────┼─▶ http/middleware (origin gate, request ID)    │
//!  (browser)         │        │                                       │
//!                    │        ▼                                       │
//!                    │   http/handlers  ──▶  notes (merge/filter)     │
//!                    │        │                                       │
//!                    │        ▼                                       │
//!                    │   shopify::DocumentStore (read / write blob) ──┼──▶ Admin
//!                    │                                                │    GraphQL API
//!                    │  ┌──────────────────────────────────────────┐  │
//!                    │  │  config · observability · lifecycle      │  │
//!                    │  └──────────────────────────────────────────┘  │
//!                    └────────────────────────────────────────────────┘
//! ```
//!
//! Each request is stateless: validate, read the customer's document,
//! mutate in memory, write the whole document back. Concurrent writers to
//! the same customer race on the blob; the last write wins.

// Core subsystems
pub mod config;
pub mod http;
pub mod notes;
pub mod shopify;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
