//! Session-scoped color cache.
//!
//! Maps a normalized color label to the color it resolved to. Entries are
//! written once per label and never evicted or replaced for the lifetime of
//! the session, so a label costs at most one remote lookup.

use std::collections::HashMap;

/// Unbounded label -> resolved color map.
#[derive(Debug, Default, Clone)]
pub struct ColorCache {
    entries: HashMap<String, String>,
}

impl ColorCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the resolved color for a normalized label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Insert a resolution. If the label is already cached, the value is NOT updated.
    /// Returns `true` if the entry was newly inserted, `false` if it already existed.
    pub fn insert(&mut self, label: impl Into<String>, color: impl Into<String>) -> bool {
        let label = label.into();
        if self.entries.contains_key(&label) {
            return false;
        }
        self.entries.insert(label, color.into());
        true
    }

    pub fn contains_key(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Number of cached labels.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
