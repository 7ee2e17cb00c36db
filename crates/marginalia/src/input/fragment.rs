//! Splitting an upload into record fragments.

use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiter written after every record by the serializer.
pub const SEPARATOR: &str = "\r\n==========\r\n";

/// A line holding only a run of ten or more `=`, with the blank space and
/// line breaks around it. Runs inside a line of text are not delimiters.
static DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)\s*^[ \t]*={10,}[ \t\r]*$\s*").expect("valid delimiter pattern")
});

const BOM: char = '\u{feff}';

/// Split raw upload text into the fragments worth parsing, in file order.
///
/// Pieces are trimmed and whitespace-only pieces are dropped, including the
/// empty piece that follows a trailing delimiter. With `strip_bom`, a
/// byte-order mark at the start of a piece is removed first.
pub fn split_fragments(raw: &str, strip_bom: bool) -> Vec<&str> {
    DELIMITER
        .split(raw)
        .map(|piece| if strip_bom { piece.trim_start_matches(BOM) } else { piece })
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_drops_trailing_empty_piece() {
        let raw = "one\n==========\ntwo\n==========\n";
        assert_eq!(split_fragments(raw, true), vec!["one", "two"]);
    }

    #[test]
    fn test_split_crlf_and_long_runs() {
        let raw = "one\r\n===============\r\n\r\ntwo";
        assert_eq!(split_fragments(raw, true), vec!["one", "two"]);
    }

    #[test]
    fn test_short_runs_are_not_delimiters() {
        let raw = "a ========= b";
        assert_eq!(split_fragments(raw, true), vec!["a ========= b"]);
    }

    #[test]
    fn test_inline_runs_are_not_delimiters() {
        let raw = "Dune (Frank Herbert)\r\n- Your Note on page 1 | Added on x\r\n\r\nbefore ========== after\r\n==========\r\n";
        assert_eq!(
            split_fragments(raw, true),
            vec!["Dune (Frank Herbert)\r\n- Your Note on page 1 | Added on x\r\n\r\nbefore ========== after"]
        );

        let raw = "one\n==========trailing text\n==========\ntwo";
        assert_eq!(split_fragments(raw, true), vec!["one\n==========trailing text", "two"]);
    }

    #[test]
    fn test_indented_delimiter_line() {
        let raw = "one\r\n  ==========  \r\ntwo";
        assert_eq!(split_fragments(raw, true), vec!["one", "two"]);
    }

    #[test]
    fn test_whitespace_only_pieces_are_discarded() {
        let raw = "==========\n   \n==========\nkept\n==========";
        assert_eq!(split_fragments(raw, true), vec!["kept"]);
    }

    #[test]
    fn test_leading_blank_lines_are_trimmed() {
        let raw = "\r\n\r\nfirst\n==========\nsecond\n";
        assert_eq!(split_fragments(raw, true), vec!["first", "second"]);
    }

    #[test]
    fn test_bom_handling() {
        let raw = "\u{feff}first\n==========\n\u{feff}second";
        assert_eq!(split_fragments(raw, true), vec!["first", "second"]);
        assert_eq!(
            split_fragments(raw, false),
            vec!["\u{feff}first", "\u{feff}second"]
        );
    }

    #[test]
    fn test_separator_is_a_delimiter() {
        let raw = format!("a{}b{}", SEPARATOR, SEPARATOR);
        assert_eq!(split_fragments(&raw, true), vec!["a", "b"]);
    }
}
