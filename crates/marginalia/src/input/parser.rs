//! Record grammar: turns one fragment into a structured clipping draft.
//!
//! A fragment looks like
//!
//! ```text
//! Title (Author)
//! - Your Highlight on page 5 | location 70-71 | Added on Monday, 1 January 2024
//!
//! Body text
//! ```
//!
//! The title line may also use the `Title - Author` form. Page and location
//! ranges are optional, and bookmarks usually have no body.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::{ParseError, ParseFailure};
use crate::model::{ClippingDraft, ClippingKind};

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

/// `Title (Author)`; the greedy title makes the last parenthesised group the author.
static TITLE_PAREN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.+) \((?P<author>[^()]*)\)[ \t]*$").expect("valid title pattern")
});

/// `Title - Author`
static TITLE_DASH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.+) - (?P<author>.+?)[ \t]*$").expect("valid title pattern")
});

static METADATA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^- Your (?P<kind>Highlight|Bookmark|Note)",
        r"(?: on [Pp]age (?P<page_start>[0-9A-Za-z]+)(?:-(?P<page_end>[0-9A-Za-z]+))?)?",
        r"(?:(?: \| | at | on )(?i:location) (?P<loc_start>\d+)(?:-(?P<loc_end>\d+))?)?",
        r" \| Added on (?P<date>.*?)[ \t]*$",
    ))
    .expect("valid metadata pattern")
});

/// Parses single record fragments.
///
/// The parser never decides what happens to a fragment it cannot read; it
/// returns a [`ParseError`] and leaves skipping or aborting to the caller.
#[derive(Debug, Clone, Default)]
pub struct RecordParser;

impl RecordParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one non-empty fragment. `index` is its position in the upload
    /// and is only used for error reporting.
    pub fn parse(&self, fragment: &str, index: usize) -> Result<ClippingDraft, ParseError> {
        let fail = |reason| ParseError {
            fragment: fragment.to_string(),
            index,
            reason,
        };

        let first_break = fragment
            .find('\n')
            .ok_or_else(|| fail(ParseFailure::MissingMetadata))?;
        let title_line = fragment[..first_break].trim_end_matches('\r');
        let (metadata_line, body) = split_line(&fragment[first_break + 1..]);

        let (title, author) = parse_title_line(title_line).ok_or_else(|| fail(ParseFailure::TitleLine))?;
        let meta = METADATA
            .captures(metadata_line)
            .ok_or_else(|| fail(ParseFailure::MetadataLine))?;

        let kind = ClippingKind::from_label(&meta["kind"]).ok_or_else(|| fail(ParseFailure::MetadataLine))?;

        // Title line, its line break and the metadata line, minus any trailing `\r`.
        let metadata_end = first_break + 1 + metadata_line.len();

        Ok(ClippingDraft {
            title,
            author,
            kind,
            page_start: capture(&meta, "page_start"),
            page_end: capture(&meta, "page_end"),
            location_start: capture(&meta, "loc_start"),
            location_end: capture(&meta, "loc_end"),
            date: meta["date"].to_string(),
            text: body.map(strip_blank_separator).unwrap_or("").to_string(),
            raw_fragment: fragment.to_string(),
            metadata_text: fragment[..metadata_end].to_string(),
        })
    }
}

/// Parse a fragment with the default parser.
pub fn parse_fragment(fragment: &str) -> Result<ClippingDraft, ParseError> {
    RecordParser::new().parse(fragment, 0)
}

fn parse_title_line(line: &str) -> Option<(String, String)> {
    TITLE_PAREN
        .captures(line)
        .or_else(|| TITLE_DASH.captures(line))
        .map(|caps| (caps["title"].to_string(), caps["author"].to_string()))
}

fn capture(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().to_string())
}

/// Split off the first line. The returned line excludes its `\r\n` or `\n`;
/// the remainder is `None` when there was no line break at all.
fn split_line(text: &str) -> (&str, Option<&str>) {
    match text.find('\n') {
        Some(pos) => (text[..pos].trim_end_matches('\r'), Some(&text[pos + 1..])),
        None => (text.trim_end_matches('\r'), None),
    }
}

/// Drop the single blank line between metadata and body, if present.
fn strip_blank_separator(body: &str) -> &str {
    match body.find('\n') {
        Some(pos) if body[..pos].trim().is_empty() => &body[pos + 1..],
        None if body.trim().is_empty() => "",
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_highlight() {
        let draft = parse_fragment(
            "Title (Author)\n- Your Highlight on page 5 | Added on 1 Jan 2020\n\nSample text",
        )
        .unwrap();

        assert_eq!(draft.title, "Title");
        assert_eq!(draft.author, "Author");
        assert_eq!(draft.kind, ClippingKind::Highlight);
        assert_eq!(draft.page_start.as_deref(), Some("5"));
        assert_eq!(draft.page_end, None);
        assert_eq!(draft.location_start, None);
        assert_eq!(draft.date, "1 Jan 2020");
        assert_eq!(draft.text, "Sample text");
        assert_eq!(
            draft.metadata_text,
            "Title (Author)\n- Your Highlight on page 5 | Added on 1 Jan 2020"
        );
    }

    #[test]
    fn test_parse_ranges_and_crlf() {
        let fragment = "Dune (Frank Herbert)\r\n- Your Highlight on page 12-13 | location 170-172 | Added on Monday, 1 January 2024 10:00:00\r\n\r\nFear is the mind-killer.";
        let draft = parse_fragment(fragment).unwrap();

        assert_eq!(draft.page_start.as_deref(), Some("12"));
        assert_eq!(draft.page_end.as_deref(), Some("13"));
        assert_eq!(draft.location_start.as_deref(), Some("170"));
        assert_eq!(draft.location_end.as_deref(), Some("172"));
        assert_eq!(draft.date, "Monday, 1 January 2024 10:00:00");
        assert_eq!(draft.text, "Fear is the mind-killer.");
        assert!(draft.metadata_text.ends_with("10:00:00"));
        assert!(draft.metadata_text.contains("\r\n- Your"));
        assert_eq!(draft.raw_fragment, fragment);
    }

    #[test]
    fn test_parse_dash_author() {
        let draft = parse_fragment(
            "The Left Hand of Darkness - Ursula K. Le Guin\n- Your Note on page 40 | Added on today\n\nRemember this",
        )
        .unwrap();

        assert_eq!(draft.title, "The Left Hand of Darkness");
        assert_eq!(draft.author, "Ursula K. Le Guin");
        assert_eq!(draft.kind, ClippingKind::Note);
    }

    #[test]
    fn test_last_parenthesised_group_is_author() {
        let draft = parse_fragment(
            "Collected Stories (Vol. 2) (Jorge Luis Borges)\n- Your Highlight on page 1 | Added on x\n\nbody",
        )
        .unwrap();

        assert_eq!(draft.title, "Collected Stories (Vol. 2)");
        assert_eq!(draft.author, "Jorge Luis Borges");
    }

    #[test]
    fn test_bookmark_without_page_or_body() {
        let draft = parse_fragment(
            "Dune (Frank Herbert)\n- Your Bookmark at location 4377 | Added on Sunday, 2 June 2024\n\n",
        )
        .unwrap();

        assert_eq!(draft.kind, ClippingKind::Bookmark);
        assert_eq!(draft.page_start, None);
        assert_eq!(draft.location_start.as_deref(), Some("4377"));
        assert_eq!(draft.text, "");
    }

    #[test]
    fn test_bookmark_metadata_only() {
        let draft =
            parse_fragment("Dune (Frank Herbert)\n- Your Bookmark on page 3 | Added on x").unwrap();
        assert_eq!(draft.text, "");
        assert_eq!(draft.page_start.as_deref(), Some("3"));
    }

    #[test]
    fn test_roman_page_and_capital_location() {
        let draft = parse_fragment(
            "Dune (Frank Herbert)\n- Your Highlight on page xii | Location 88-90 | Added on x\n\nPreface",
        )
        .unwrap();

        assert_eq!(draft.page_start.as_deref(), Some("xii"));
        assert_eq!(draft.location_start.as_deref(), Some("88"));
        assert_eq!(draft.location_end.as_deref(), Some("90"));
    }

    #[test]
    fn test_multiline_body_is_verbatim() {
        let draft = parse_fragment(
            "A (B)\n- Your Note on page 1 | Added on x\n\nline one\n\nline three",
        )
        .unwrap();
        assert_eq!(draft.text, "line one\n\nline three");
    }

    #[test]
    fn test_missing_metadata_line() {
        let err = RecordParser::new().parse("Just a title (Someone)", 4).unwrap_err();
        assert_eq!(err.reason, ParseFailure::MissingMetadata);
        assert_eq!(err.index, 4);
        assert_eq!(err.fragment, "Just a title (Someone)");
    }

    #[test]
    fn test_bad_title_line() {
        let err = parse_fragment("No author here\n- Your Note on page 1 | Added on x\n\nhi").unwrap_err();
        assert_eq!(err.reason, ParseFailure::TitleLine);
    }

    #[test]
    fn test_bad_metadata_line() {
        let err = parse_fragment("A (B)\n- Your Scribble on page 1 | Added on x\n\nhi").unwrap_err();
        assert_eq!(err.reason, ParseFailure::MetadataLine);

        let err = parse_fragment("A (B)\nsome prose\n\nhi").unwrap_err();
        assert_eq!(err.reason, ParseFailure::MetadataLine);
    }
}
