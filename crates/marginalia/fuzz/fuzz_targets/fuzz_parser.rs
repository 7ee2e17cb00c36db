//! Fuzz target for the clippings parser.
//!
//! Checks that ingestion:
//! 1. Never panics on malformed input
//! 2. Accounts for every fragment as either a clipping or an unparsed entry
//! 3. Serializes whatever it accepted

#![no_main]

use libfuzzer_sys::fuzz_target;
use marginalia::input::{parse_fragment, split_fragments};
use marginalia::{Corpus, Scope};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    for fragment in split_fragments(text, true) {
        let _ = parse_fragment(fragment);
    }

    let mut corpus = Corpus::new();
    let source = corpus.ingest(text, "fuzz.txt");
    assert_eq!(source.clippings.len() + source.unparsed.len(), source.fragment_count);

    let _ = corpus.serialize(Scope::All, true);
});
