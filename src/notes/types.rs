//! Document types stored in the customer metafield.
//!
//! All types deserialize leniently: every field has a default so that legacy
//! or partially-written documents parse instead of erroring. The document is
//! always read and written as one JSON blob.

use serde::{Deserialize, Serialize};

/// Root document stored under the `tasting.events` customer metafield.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TastingDocument {
    pub events: Vec<TastingEvent>,
}

/// One tasting session, keyed by its collection handle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TastingEvent {
    /// Stable identifier; equals `collection_handle` at creation.
    pub id: String,
    pub name: String,
    /// ISO date (YYYY-MM-DD), set once when the event is created.
    pub date: String,
    pub collection_handle: String,
    pub wines: Vec<TastingEntry>,
}

/// One customer's notes and rating for one product within one event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TastingEntry {
    pub product_id: u64,
    pub handle: String,
    pub title: String,
    pub rating: Option<f64>,
    pub nose: String,
    pub palate: String,
    pub note: String,
    /// RFC 3339 timestamp, set once at first creation, never overwritten.
    pub created_at: String,
    /// RFC 3339 timestamp, refreshed on every write.
    pub updated_at: String,
}

impl TastingDocument {
    /// Parse a raw metafield value, substituting the empty document when the
    /// stored JSON is malformed or has an unexpected shape.
    pub fn from_metafield_value(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }

    /// Find an event by its collection handle (or legacy `id`).
    pub fn event_by_handle_mut(&mut self, handle: &str) -> Option<&mut TastingEvent> {
        self.events
            .iter_mut()
            .find(|e| e.collection_handle == handle || e.id == handle)
    }

    /// Find an event by its display name.
    pub fn event_by_name_mut(&mut self, name: &str) -> Option<&mut TastingEvent> {
        self.events.iter_mut().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_metafield_yields_empty_document() {
        let doc = TastingDocument::from_metafield_value("not json at all");
        assert!(doc.events.is_empty());

        let doc = TastingDocument::from_metafield_value(r#"{"events": "oops"}"#);
        assert!(doc.events.is_empty());
    }

    #[test]
    fn legacy_document_parses_with_defaults() {
        // Entries written before created_at existed must still parse.
        let raw = r#"{
            "events": [{
                "collection_handle": "spring-tasting",
                "wines": [{"product_id": 7, "updated_at": "2024-01-01T00:00:00Z"}]
            }]
        }"#;
        let doc = TastingDocument::from_metafield_value(raw);
        assert_eq!(doc.events.len(), 1);
        let wine = &doc.events[0].wines[0];
        assert_eq!(wine.product_id, 7);
        assert!(wine.created_at.is_empty());
        assert_eq!(wine.updated_at, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn event_lookup_matches_handle_or_legacy_id() {
        let mut doc = TastingDocument {
            events: vec![TastingEvent {
                id: "old-id".into(),
                collection_handle: "new-handle".into(),
                ..Default::default()
            }],
        };
        assert!(doc.event_by_handle_mut("new-handle").is_some());
        assert!(doc.event_by_handle_mut("old-id").is_some());
        assert!(doc.event_by_handle_mut("missing").is_none());
    }
}
