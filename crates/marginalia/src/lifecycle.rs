//! Mark / delete / edit transitions on clippings.
//!
//! ```text
//! Active --mark--> Marked --unmark--> Active
//! Active | Marked --delete--> Deleted --undelete--> Active
//! ```
//!
//! Editing is orthogonal: it sets or clears `text_edited` in any state, and an
//! edit made while deleted survives undelete. Every transition is idempotent
//! and keeps the live counts of the corpus, the book and the source equal to
//! the number of non-deleted clippings they contain.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{Corpus, Scope};
use crate::error::Result;
use crate::model::{Clipping, ClippingId};

/// A state-changing request on one clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Mark,
    Unmark,
    Delete,
    Undelete,
}

/// What applying a transition did to a clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    /// The request did not apply in the current state.
    Unchanged,
    /// Flags changed; the clipping is still live (or still deleted).
    Changed,
    /// The clipping left the live set.
    Removed,
    /// The clipping rejoined the live set.
    Restored,
}

impl Effect {
    pub(crate) fn changed(self) -> bool {
        self != Effect::Unchanged
    }
}

impl Clipping {
    pub(crate) fn apply(&mut self, transition: Transition) -> Effect {
        match transition {
            Transition::Mark if self.deleted || self.marked => Effect::Unchanged,
            Transition::Mark => {
                self.marked = true;
                Effect::Changed
            }
            Transition::Unmark if !self.marked => Effect::Unchanged,
            Transition::Unmark => {
                self.marked = false;
                Effect::Changed
            }
            Transition::Delete if self.deleted => Effect::Unchanged,
            Transition::Delete => {
                self.deleted = true;
                self.marked = false;
                Effect::Removed
            }
            Transition::Undelete if !self.deleted => Effect::Unchanged,
            Transition::Undelete => {
                self.deleted = false;
                Effect::Restored
            }
        }
    }
}

impl Corpus {
    /// Apply a transition to one clipping. Returns whether anything changed.
    pub fn transition(&mut self, id: ClippingId, transition: Transition) -> Result<bool> {
        let clipping = self.clipping_mut(id)?;
        let effect = clipping.apply(transition);
        let (book_id, source_id) = (clipping.book_id, clipping.source_id);

        match effect {
            Effect::Removed => self.adjust_live_counts(book_id, source_id, false),
            Effect::Restored => self.adjust_live_counts(book_id, source_id, true),
            Effect::Changed | Effect::Unchanged => {}
        }

        if effect.changed() {
            debug!(clipping = %id, ?transition, "clipping state changed");
        }
        Ok(effect.changed())
    }

    /// Select a clipping. No-op if it is deleted or already marked.
    pub fn mark(&mut self, id: ClippingId) -> Result<bool> {
        self.transition(id, Transition::Mark)
    }

    /// Clear the selection. No-op if the clipping is not marked.
    pub fn unmark(&mut self, id: ClippingId) -> Result<bool> {
        self.transition(id, Transition::Unmark)
    }

    /// Soft-delete a clipping, clearing its mark.
    pub fn delete(&mut self, id: ClippingId) -> Result<bool> {
        self.transition(id, Transition::Delete)
    }

    /// Restore a soft-deleted clipping to the active state.
    pub fn undelete(&mut self, id: ClippingId) -> Result<bool> {
        self.transition(id, Transition::Undelete)
    }

    /// Replace the body used for export, whatever the clipping's state.
    pub fn edit(&mut self, id: ClippingId, text: impl Into<String>) -> Result<()> {
        self.clipping_mut(id)?.text_edited = Some(text.into());
        Ok(())
    }

    /// Drop an edit so the parsed body is used again. Returns whether an edit existed.
    pub fn clear_edit(&mut self, id: ClippingId) -> Result<bool> {
        Ok(self.clipping_mut(id)?.text_edited.take().is_some())
    }

    /// Soft-delete every live exact duplicate in scope. Returns how many were deleted.
    pub fn delete_duplicates(&mut self, scope: Scope) -> Result<usize> {
        let ids: Vec<ClippingId> = self
            .get_clippings(scope)?
            .into_iter()
            .filter(|c| c.is_duplicate())
            .map(|c| c.id)
            .collect();
        self.apply_all(&ids, Transition::Delete)
    }

    /// Soft-delete every marked clipping. Returns how many were deleted.
    pub fn delete_marked(&mut self) -> Result<usize> {
        let ids = self.ids_in(Scope::Marked)?;
        self.apply_all(&ids, Transition::Delete)
    }

    /// Clear every mark. Returns how many clippings were unmarked.
    pub fn unmark_all(&mut self) -> Result<usize> {
        let ids = self.ids_in(Scope::Marked)?;
        self.apply_all(&ids, Transition::Unmark)
    }

    fn ids_in(&self, scope: Scope) -> Result<Vec<ClippingId>> {
        Ok(self.get_clippings(scope)?.into_iter().map(|c| c.id).collect())
    }

    fn apply_all(&mut self, ids: &[ClippingId], transition: Transition) -> Result<usize> {
        let mut changed = 0;
        for id in ids {
            if self.transition(*id, transition)? {
                changed += 1;
            }
        }
        Ok(changed)
    }
}
