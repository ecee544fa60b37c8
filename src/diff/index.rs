//! PathIndex - relative path to attributes map for one side of a recursive diff
//!
//! Exclusively written by the listing task that builds it, then handed to the
//! compare pass read-only. Lookups are exact-key only; a path that is merely a
//! prefix of a stored key is not considered present.

use crate::types::EntryAttributes;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct PathIndex {
    entries: BTreeMap<String, EntryAttributes>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry keyed by its relative path.
    pub fn insert(&mut self, attrs: EntryAttributes) {
        self.entries.insert(attrs.name.clone(), attrs);
    }

    pub fn get(&self, name: &str) -> Option<&EntryAttributes> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntryAttributes)> {
        self.entries.iter().map(|(name, attrs)| (name.as_str(), attrs))
    }
}
