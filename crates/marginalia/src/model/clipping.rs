//! Clipping records.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{BookId, ClippingId, SourceId};

/// Kind of annotation a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClippingKind {
    Highlight,
    Bookmark,
    Note,
}

impl ClippingKind {
    /// The word used for this kind on the metadata line.
    pub fn label(&self) -> &'static str {
        match self {
            ClippingKind::Highlight => "Highlight",
            ClippingKind::Bookmark => "Bookmark",
            ClippingKind::Note => "Note",
        }
    }

    /// Parse the word used on the metadata line.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Highlight" => Some(ClippingKind::Highlight),
            "Bookmark" => Some(ClippingKind::Bookmark),
            "Note" => Some(ClippingKind::Note),
            _ => None,
        }
    }

    /// All kinds, in display order.
    pub fn all() -> &'static [ClippingKind] {
        &[ClippingKind::Highlight, ClippingKind::Bookmark, ClippingKind::Note]
    }
}

/// Lifecycle state of a clipping, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClippingState {
    /// Initial state.
    Active,
    /// Selected by the user.
    Marked,
    /// Soft-deleted; still present in every collection.
    Deleted,
}

impl ClippingState {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ClippingState::Active => "Active",
            ClippingState::Marked => "Marked",
            ClippingState::Deleted => "Deleted",
        }
    }
}

/// Structured fields extracted from one fragment, before the record is
/// linked into the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClippingDraft {
    pub title: String,
    pub author: String,
    pub kind: ClippingKind,
    pub page_start: Option<String>,
    pub page_end: Option<String>,
    pub location_start: Option<String>,
    pub location_end: Option<String>,
    /// Free text following `Added on`, not parsed further.
    pub date: String,
    /// Body text, empty for most bookmarks.
    pub text: String,
    /// The whole fragment, verbatim.
    pub raw_fragment: String,
    /// Title line and metadata line, verbatim, without a trailing line break.
    pub metadata_text: String,
}

/// A parsed highlight, bookmark or note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clipping {
    pub id: ClippingId,
    pub title: String,
    pub author: String,
    pub kind: ClippingKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_end: Option<String>,
    pub date: String,
    pub text: String,
    pub raw_fragment: String,
    pub metadata_text: String,
    /// User override of `text`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_edited: Option<String>,
    pub source_id: SourceId,
    pub book_id: BookId,
    /// Earliest clipping with a byte-identical raw fragment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<ClippingId>,
    /// Clippings sharing a long run of body text; filled by a similarity scan.
    pub similar: BTreeSet<ClippingId>,
    pub marked: bool,
    pub deleted: bool,
}

impl Clipping {
    pub(crate) fn from_draft(
        id: ClippingId,
        draft: ClippingDraft,
        source_id: SourceId,
        book_id: BookId,
        duplicate_of: Option<ClippingId>,
    ) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            kind: draft.kind,
            page_start: draft.page_start,
            page_end: draft.page_end,
            location_start: draft.location_start,
            location_end: draft.location_end,
            date: draft.date,
            text: draft.text,
            raw_fragment: draft.raw_fragment,
            metadata_text: draft.metadata_text,
            text_edited: None,
            source_id,
            book_id,
            duplicate_of,
            similar: BTreeSet::new(),
            marked: false,
            deleted: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ClippingState {
        if self.deleted {
            ClippingState::Deleted
        } else if self.marked {
            ClippingState::Marked
        } else {
            ClippingState::Active
        }
    }

    /// The edited text if present, otherwise the parsed body.
    pub fn effective_text(&self) -> &str {
        self.text_edited.as_deref().unwrap_or(&self.text)
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicate_of.is_some()
    }

    pub fn is_edited(&self) -> bool {
        self.text_edited.is_some()
    }

    /// Page range as printed on the metadata line, e.g. `12-13`.
    pub fn pages(&self) -> Option<String> {
        join_range(self.page_start.as_deref(), self.page_end.as_deref())
    }

    /// Location range as printed on the metadata line, e.g. `170-172`.
    pub fn locations(&self) -> Option<String> {
        join_range(self.location_start.as_deref(), self.location_end.as_deref())
    }
}

fn join_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start, end) {
        (Some(s), Some(e)) => Some(format!("{}-{}", s, e)),
        (Some(s), None) => Some(s.to_string()),
        _ => None,
    }
}
