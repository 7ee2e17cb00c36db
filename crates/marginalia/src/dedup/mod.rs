//! Duplicate and near-duplicate detection.
//!
//! Exact duplicates are resolved corpus-wide at ingestion time: identity is a
//! property of the record. Near-duplicates are found on demand by scanning a
//! caller-chosen set of clippings, usually one book.

mod exact;
mod similar;

pub use exact::IdentityResolver;
pub use similar::{longest_common_run, CommonRun, SimilarPair, SimilarityScanner, DEFAULT_SIMILARITY_THRESHOLD};
