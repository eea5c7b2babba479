//! Request middleware for the proxy routes.

pub mod cors;

pub use cors::{origin_gate, CorsState};
