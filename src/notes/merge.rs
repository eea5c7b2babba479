//! In-memory merge and filter operations over a tasting document.
//!
//! # Responsibilities
//! - Upsert one entry into an event, keyed on `product_id`
//! - Remove entries from an event by product id or handle
//! - Enforce text length caps and timestamp invariants
//!
//! # Design Decisions
//! - `created_at` is written once and preserved on every later upsert;
//!   missing values are back-filled from `updated_at` (legacy repair)
//! - Removal matches on product_id OR handle; either match removes the entry
//! - A zero product_id or empty handle never matches anything

use chrono::{DateTime, Utc};

use crate::notes::types::{TastingDocument, TastingEntry, TastingEvent};

/// Maximum stored length for the free-text fields (`nose`, `palate`, `note`).
pub const MAX_TEXT_LEN: usize = 2000;

/// Fields supplied by the caller for an upsert. `None` means "not supplied":
/// the existing value is kept on update.
#[derive(Debug, Clone, Default)]
pub struct ProductInput {
    pub product_id: u64,
    pub handle: Option<String>,
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub nose: Option<String>,
    pub palate: Option<String>,
    pub note: Option<String>,
}

/// Match key for removal. Either side being present is enough; a match on
/// either removes the entry.
#[derive(Debug, Clone, Default)]
pub struct RemoveKey {
    pub product_id: Option<u64>,
    pub handle: Option<String>,
}

fn truncate_text(s: &str) -> String {
    if s.chars().count() <= MAX_TEXT_LEN {
        s.to_string()
    } else {
        s.chars().take(MAX_TEXT_LEN).collect()
    }
}

/// Non-empty supplied value wins, otherwise the existing one is kept.
fn overlay_name(supplied: Option<&str>, existing: &str) -> String {
    match supplied {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => existing.to_string(),
    }
}

/// Supplied value wins even when empty; absent keeps the existing one.
fn overlay_text(supplied: Option<&str>, existing: &str) -> String {
    truncate_text(supplied.unwrap_or(existing))
}

/// Upsert a tasting entry into the event for `event_handle`, creating the
/// event if it does not exist yet. Returns a mutable reference to the
/// touched event.
pub fn upsert_entry<'a>(
    doc: &'a mut TastingDocument,
    event_handle: &str,
    event_name: Option<&str>,
    product: &ProductInput,
    now: DateTime<Utc>,
) -> &'a mut TastingEvent {
    let now_ts = now.to_rfc3339();

    let idx = doc
        .events
        .iter()
        .position(|e| e.collection_handle == event_handle || e.id == event_handle);
    let idx = match idx {
        Some(i) => i,
        None => {
            doc.events.push(TastingEvent {
                id: event_handle.to_string(),
                name: event_name
                    .filter(|n| !n.is_empty())
                    .unwrap_or(event_handle)
                    .to_string(),
                date: now.date_naive().to_string(),
                collection_handle: event_handle.to_string(),
                wines: Vec::new(),
            });
            doc.events.len() - 1
        }
    };
    let event = &mut doc.events[idx];

    match event
        .wines
        .iter()
        .position(|w| w.product_id == product.product_id)
    {
        None => {
            event.wines.push(TastingEntry {
                product_id: product.product_id,
                handle: product.handle.clone().unwrap_or_default(),
                title: product.title.clone().unwrap_or_default(),
                rating: product.rating,
                nose: truncate_text(product.nose.as_deref().unwrap_or("")),
                palate: truncate_text(product.palate.as_deref().unwrap_or("")),
                note: truncate_text(product.note.as_deref().unwrap_or("")),
                created_at: now_ts.clone(),
                updated_at: now_ts.clone(),
            });
        }
        Some(i) => {
            let existing = &mut event.wines[i];
            existing.handle = overlay_name(product.handle.as_deref(), &existing.handle);
            existing.title = overlay_name(product.title.as_deref(), &existing.title);
            if let Some(rating) = product.rating {
                existing.rating = Some(rating);
            }
            existing.nose = overlay_text(product.nose.as_deref(), &existing.nose);
            existing.palate = overlay_text(product.palate.as_deref(), &existing.palate);
            existing.note = overlay_text(product.note.as_deref(), &existing.note);
            if existing.created_at.is_empty() {
                // Legacy repair: fall back to the last write time.
                existing.created_at = if existing.updated_at.is_empty() {
                    now_ts.clone()
                } else {
                    existing.updated_at.clone()
                };
            }
            existing.updated_at = now_ts.clone();
        }
    }

    // Back-fill created_at on any legacy entries in this event.
    for wine in &mut event.wines {
        if wine.created_at.is_empty() {
            wine.created_at = if wine.updated_at.is_empty() {
                now_ts.clone()
            } else {
                wine.updated_at.clone()
            };
        }
    }

    event
}

/// Remove all entries from `event.wines` matching the key. Returns the
/// number of entries removed. The event itself is left in place even when
/// its wine list becomes empty.
pub fn remove_entries(event: &mut TastingEvent, key: &RemoveKey) -> usize {
    let pid = key.product_id.filter(|p| *p != 0);
    let handle = key.handle.as_deref().filter(|h| !h.is_empty());

    let before = event.wines.len();
    event.wines.retain(|w| {
        let by_pid = pid.is_some_and(|p| w.product_id != 0 && w.product_id == p);
        let by_handle = handle.is_some_and(|h| !w.handle.is_empty() && w.handle == h);
        !(by_pid || by_handle)
    });
    before - event.wines.len()
}
