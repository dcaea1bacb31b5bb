//! Portfolio content domain model.
//!
//! # Responsibility
//! - Define the project and achievement records managed by the content store.
//! - Provide the shared `Entity` contract the store's generic collection
//!   operations are written against.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once and never rewritten by a patch.
//! - Display order is a stable ascending sort by `order`.

pub mod achievement;
pub mod defaults;
pub mod project;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Opaque entity identifier.
///
/// Freshly added entities get UUID v4 strings; imported or built-in records
/// may carry any string.
pub type EntityId = String;

/// Creation timestamp, serialized as RFC 3339.
pub type Timestamp = DateTime<Utc>;

/// Record shape shared by projects and achievements.
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// Caller-supplied fields for `add`.
    type Draft;
    /// Optional-field update merged over an existing record.
    type Patch;

    /// Stable kind name used in log events.
    const KIND: &'static str;

    fn id(&self) -> &str;
    fn order(&self) -> i64;
    fn set_order(&mut self, order: i64);

    /// Materializes a draft with store-assigned identity fields.
    fn from_draft(draft: Self::Draft, id: EntityId, order: i64, created_at: Timestamp) -> Self;

    /// Merges a patch field-by-field. `id` and `created_at` are never touched.
    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Returns a copy of `items` in display order.
///
/// Entities sharing an `order` keep their relative collection position.
pub fn sort_for_display<T: Entity>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.order());
    sorted
}

/// Splits comma-separated tag input into display-ordered labels.
///
/// Entries are trimmed, inner whitespace is collapsed to one space and empty
/// entries are dropped.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|tag| WHITESPACE_RE.replace_all(tag.trim(), " ").into_owned())
        .filter(|tag| !tag.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_tags;

    #[test]
    fn parse_tags_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_tags(" React ,Node.js,, ,Material   UI"),
            vec!["React", "Node.js", "Material UI"]
        );
    }

    #[test]
    fn parse_tags_of_blank_input_is_empty() {
        assert!(parse_tags("   ").is_empty());
    }
}
