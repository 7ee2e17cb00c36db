//! Error types for the marginalia library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{BookId, ClippingId, SourceId};

/// Which part of the record grammar a fragment failed to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailure {
    /// The fragment has no line break after the title line.
    MissingMetadata,
    /// The first line is neither `Title (Author)` nor `Title - Author`.
    TitleLine,
    /// The second line is not a `- Your <Type> ... | Added on <date>` line.
    MetadataLine,
}

impl ParseFailure {
    /// Get a human-readable description.
    pub fn describe(&self) -> &'static str {
        match self {
            ParseFailure::MissingMetadata => "fragment has fewer than two lines",
            ParseFailure::TitleLine => "first line is not `Title (Author)` or `Title - Author`",
            ParseFailure::MetadataLine => "second line is not a `- Your <Type> ...` metadata line",
        }
    }
}

/// A fragment that does not match the record grammar.
///
/// Retained on the owning source so callers can report what was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("fragment {} ({}): {:?}", .index, .reason.describe(), first_line(.fragment))]
pub struct ParseError {
    /// The offending fragment, verbatim.
    pub fragment: String,
    /// Position of the fragment within its upload (0-based, empty fragments excluded).
    pub index: usize,
    /// What went wrong.
    pub reason: ParseFailure,
}

/// Start of the fragment's first line, for messages.
fn first_line(fragment: &str) -> String {
    fragment.lines().next().unwrap_or("").chars().take(60).collect()
}

/// Main error type for marginalia operations.
#[derive(Debug, Error)]
pub enum ClippingsError {
    /// Error reading or accessing an upload.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Upload could not be decoded as UTF-8 text.
    #[error("'{path}' is not valid UTF-8 text")]
    Encoding { path: PathBuf },

    /// Fragment did not match the record grammar.
    #[error("Parse error in {0}")]
    Parse(#[from] ParseError),

    /// No clipping with this id exists in the corpus.
    #[error("Clipping {0} not found")]
    UnknownClipping(ClippingId),

    /// No book with this id exists in the corpus.
    #[error("Book {0} not found")]
    UnknownBook(BookId),

    /// No source with this id exists in the corpus.
    #[error("Source {0} not found")]
    UnknownSource(SourceId),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from the CSV writer.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ClippingsError {
    /// Whether this error means an upload could not be read at all.
    pub fn is_read_error(&self) -> bool {
        matches!(self, ClippingsError::Io { .. } | ClippingsError::Encoding { .. })
    }
}

/// Result type alias for marginalia operations.
pub type Result<T> = std::result::Result<T, ClippingsError>;
