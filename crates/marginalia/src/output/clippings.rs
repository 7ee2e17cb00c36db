//! Clippings-file serializer.

use crate::input::SEPARATOR;
use crate::model::Clipping;

/// Blank line between the metadata line and the body.
const BODY_BREAK: &str = "\r\n\r\n";

/// Render one clipping as it would appear in an export, delimiter included.
///
/// The original title and metadata lines are reused verbatim; the body is the
/// edited text when there is one.
pub fn serialize_clipping(clipping: &Clipping) -> String {
    let body = clipping.effective_text();
    let mut out = String::with_capacity(
        clipping.metadata_text.len() + BODY_BREAK.len() + body.len() + SEPARATOR.len(),
    );
    out.push_str(&clipping.metadata_text);
    out.push_str(BODY_BREAK);
    out.push_str(body);
    out.push_str(SEPARATOR);
    out
}

/// Concatenate clippings in list order, skipping deleted ones unless
/// `include_deleted` is set.
pub fn serialize(clippings: &[&Clipping], include_deleted: bool) -> String {
    clippings
        .iter()
        .filter(|c| include_deleted || !c.deleted)
        .map(|c| serialize_clipping(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_fragment;
    use crate::model::{BookId, ClippingId, SourceId};

    fn clipping(fragment: &str) -> Clipping {
        let draft = parse_fragment(fragment).unwrap();
        Clipping::from_draft(ClippingId(0), draft, SourceId(0), BookId(0), None)
    }

    #[test]
    fn test_serialize_crlf_fragment_verbatim() {
        let fragment = "Dune (Frank Herbert)\r\n- Your Highlight on page 12 | location 170-172 | Added on Monday, 1 January 2024\r\n\r\nFear is the mind-killer.";
        let out = serialize_clipping(&clipping(fragment));
        assert_eq!(out, format!("{}{}", fragment, SEPARATOR));
    }

    #[test]
    fn test_serialize_uses_edited_text() {
        let mut clip = clipping("A (B)\n- Your Note on page 1 | Added on x\n\noriginal");
        clip.text_edited = Some("changed".to_string());

        let out = serialize_clipping(&clip);
        assert_eq!(
            out,
            "A (B)\n- Your Note on page 1 | Added on x\r\n\r\nchanged\r\n==========\r\n"
        );
    }

    #[test]
    fn test_serialize_skips_deleted() {
        let kept = clipping("A (B)\n- Your Note on page 1 | Added on x\n\nkept");
        let mut gone = clipping("A (B)\n- Your Note on page 2 | Added on x\n\ngone");
        gone.deleted = true;

        let out = serialize(&[&kept, &gone], false);
        assert!(out.contains("kept"));
        assert!(!out.contains("gone"));

        let out = serialize(&[&kept, &gone], true);
        assert!(out.find("kept").unwrap() < out.find("gone").unwrap());
    }

    #[test]
    fn test_serialize_empty_list() {
        assert_eq!(serialize(&[], false), "");
    }
}
