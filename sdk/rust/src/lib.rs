//! Rust client SDK for the tasting-notes proxy.

mod client;

pub use client::{DeleteOutcome, ProxyClient, SaveNote};
