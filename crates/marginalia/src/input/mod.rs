//! Upload handling: reading files, splitting them into fragments and parsing
//! each fragment into a record.

mod fragment;
mod parser;
mod source;

pub use fragment::{split_fragments, SEPARATOR};
pub use parser::{parse_fragment, RecordParser};
pub use source::{Source, Upload};
