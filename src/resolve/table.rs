//! The `src → Dimensions` side table.

use crate::types::Dimensions;
use std::collections::HashMap;

/// Resolved dimensions keyed by image `src`.
///
/// Duplicate sources collapse to one entry. On a repeated insert the last
/// write wins; the same URL names the same bytes, so the values agree anyway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionTable {
    entries: HashMap<String, Dimensions>,
}

impl DimensionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `dims` for `src`, returning the value it replaced.
    pub fn insert(&mut self, src: impl Into<String>, dims: Dimensions) -> Option<Dimensions> {
        self.entries.insert(src.into(), dims)
    }

    pub fn get(&self, src: &str) -> Option<Dimensions> {
        self.entries.get(src).copied()
    }

    pub fn contains(&self, src: &str) -> bool {
        self.entries.contains_key(src)
    }

    /// Number of distinct sources resolved so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
