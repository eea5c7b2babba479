//! Tasting-note document model and mutation logic.
//!
//! # Data Flow
//! ```text
//! Upstream metafield JSON
//!     → types.rs (deserialize into TastingDocument)
//!     → merge.rs (upsert or filter entries in memory)
//!     → serialize back to JSON
//!     → written to the upstream metafield in full
//! ```
//!
//! # Design Decisions
//! - Mutations are pure functions over the in-memory document; the clock is
//!   passed in so tests control timestamps
//! - Lenient deserialization: unknown or missing fields fall back to
//!   defaults so legacy documents never fail to parse

pub mod merge;
pub mod types;

pub use merge::{remove_entries, upsert_entry, ProductInput, RemoveKey, MAX_TEXT_LEN};
pub use types::{TastingDocument, TastingEntry, TastingEvent};
