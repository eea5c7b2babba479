//! The document-store capability handlers are written against.

use async_trait::async_trait;

use crate::notes::TastingDocument;
use crate::shopify::types::{CustomerId, StoreError};

/// Metafield namespace holding the tasting document.
pub const METAFIELD_NAMESPACE: &str = "tasting";
/// Metafield key holding the tasting document.
pub const METAFIELD_KEY: &str = "events";

/// Read-modify-write access to one JSON document per customer.
///
/// `get` followed by `put` is not atomic: concurrent writers to the same
/// customer race on the whole document and the last write wins. Keeping the
/// access behind this trait isolates that limitation for a future
/// transactional replacement.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check that `email` matches the platform's record for the customer.
    async fn verify_customer(
        &self,
        customer_id: &CustomerId,
        email: &str,
    ) -> Result<bool, StoreError>;

    /// Fetch the customer's document. `None` means the metafield does not
    /// exist at all; a present but malformed value yields the empty document.
    async fn get(&self, customer_id: &CustomerId) -> Result<Option<TastingDocument>, StoreError>;

    /// Write the full document back to the customer's metafield.
    async fn put(&self, customer_id: &CustomerId, doc: &TastingDocument)
        -> Result<(), StoreError>;
}
