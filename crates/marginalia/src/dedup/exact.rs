//! Exact-duplicate linkage by raw fragment.

use std::collections::HashMap;

use crate::model::ClippingId;

/// Maps each distinct raw fragment to the first clipping that carried it.
///
/// Only originals are registered, so every duplicate points straight at the
/// earliest clipping and chains cannot form.
#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    originals: HashMap<String, ClippingId>,
}

impl IdentityResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a newly parsed clipping.
    ///
    /// Returns the id of the earlier clipping with the same raw fragment, or
    /// `None` after registering `id` as the original for this fragment.
    pub fn resolve(&mut self, raw_fragment: &str, id: ClippingId) -> Option<ClippingId> {
        if let Some(original) = self.originals.get(raw_fragment) {
            return Some(*original);
        }
        self.originals.insert(raw_fragment.to_string(), id);
        None
    }

    /// The original registered for a fragment, if any.
    pub fn original_of(&self, raw_fragment: &str) -> Option<ClippingId> {
        self.originals.get(raw_fragment).copied()
    }

    /// Number of distinct fragments seen.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.originals.clear();
    }
}
