//! Marginalia: curation of e-reader clippings exports.
//!
//! A clippings export is a sequence of highlight, bookmark and note records
//! separated by `==========` lines. Marginalia parses uploads into a corpus
//! grouped by book, links exact duplicates, finds near-duplicate highlights,
//! and writes any selection back out in the original format.
//!
//! # Core Principles
//!
//! - **Non-destructive**: deletion is a flag; records never leave their book or source
//! - **Lossless**: metadata lines are kept verbatim and re-emitted on export
//! - **Forgiving**: a malformed record is reported and skipped, never fatal
//!
//! # Example
//!
//! ```
//! use marginalia::{Corpus, Scope};
//!
//! let mut corpus = Corpus::new();
//! corpus.ingest(
//!     "Title (Author)\n- Your Highlight on page 5 | Added on 1 Jan 2020\n\nSample text\n==========\n",
//!     "My Clippings.txt",
//! );
//!
//! let book = corpus.list_books()[0].id;
//! let text = corpus.serialize(Scope::Book(book), false).unwrap();
//! assert!(text.ends_with("Sample text\r\n==========\r\n"));
//! ```

pub mod dedup;
pub mod error;
pub mod input;
pub mod lifecycle;
pub mod model;
pub mod output;

mod corpus;

pub use crate::corpus::{Corpus, CorpusConfig, CorpusSummary, KindCounts, Scope};
pub use dedup::{CommonRun, SimilarPair, DEFAULT_SIMILARITY_THRESHOLD};
pub use error::{ClippingsError, ParseError, ParseFailure, Result};
pub use input::{RecordParser, Source, Upload, SEPARATOR};
pub use lifecycle::Transition;
pub use model::{Book, BookId, Clipping, ClippingId, ClippingKind, ClippingState, SourceId};
pub use output::ExportFormat;
