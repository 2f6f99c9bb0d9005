//! Entity trait - common interface for archival records

use serde::Serialize;

/// Common trait for records that imports create
pub trait Entity: Serialize {
    /// Record kind as stored in the keymap (e.g. "accession", "actor")
    const KIND: &'static str;

    /// Database id, once persisted
    fn id(&self) -> Option<i64>;

    /// Human readable label (identifier, name)
    fn label(&self) -> &str;

    /// Names of free-text fields that column maps may target
    fn text_fields() -> &'static [&'static str];

    /// Read a free-text field by name
    fn text_field(&self, name: &str) -> Option<&str>;

    /// Mutable access to a free-text field by name
    fn text_field_mut(&mut self, name: &str) -> Option<&mut String>;
}

/// Map an empty string to `None` for nullable columns
pub fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
