//! Tabular exports.

use serde::Serialize;

use crate::error::Result;
use crate::model::Clipping;

/// One clipping flattened into a CSV row.
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow<'a> {
    pub id: u64,
    pub source: u64,
    pub book: u64,
    pub title: &'a str,
    pub author: &'a str,
    pub kind: &'static str,
    pub pages: Option<String>,
    pub locations: Option<String>,
    pub date: &'a str,
    /// Edited text when present, otherwise the parsed body.
    pub text: &'a str,
    pub edited: bool,
    pub marked: bool,
    pub deleted: bool,
    pub duplicate_of: Option<u64>,
    /// Similar clipping ids separated by `;`.
    pub similar: String,
}

impl<'a> From<&'a Clipping> for ExportRow<'a> {
    fn from(c: &'a Clipping) -> Self {
        Self {
            id: c.id.0,
            source: c.source_id.0,
            book: c.book_id.0,
            title: &c.title,
            author: &c.author,
            kind: c.kind.label(),
            pages: c.pages(),
            locations: c.locations(),
            date: &c.date,
            text: c.effective_text(),
            edited: c.is_edited(),
            marked: c.marked,
            deleted: c.deleted,
            duplicate_of: c.duplicate_of.map(|id| id.0),
            similar: c
                .similar
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// Render clippings as CSV with a header row.
pub fn to_csv(clippings: &[&Clipping]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for clipping in clippings {
        writer.serialize(ExportRow::from(*clipping))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Render clippings as a pretty-printed JSON array.
pub fn to_json(clippings: &[&Clipping]) -> Result<String> {
    Ok(serde_json::to_string_pretty(clippings)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_fragment;
    use crate::model::{BookId, ClippingId, SourceId};

    fn clipping() -> Clipping {
        let draft = parse_fragment(
            "Dune (Frank Herbert)\n- Your Highlight on page 12-13 | location 170 | Added on today\n\nFear, \"always\" fear.",
        )
        .unwrap();
        let mut clip = Clipping::from_draft(ClippingId(4), draft, SourceId(1), BookId(2), Some(ClippingId(0)));
        clip.similar.insert(ClippingId(7));
        clip.similar.insert(ClippingId(9));
        clip
    }

    #[test]
    fn test_csv_export() {
        let clip = clipping();
        let out = to_csv(&[&clip]).unwrap();
        let mut lines = out.lines();

        assert_eq!(
            lines.next(),
            Some("id,source,book,title,author,kind,pages,locations,date,text,edited,marked,deleted,duplicate_of,similar")
        );
        assert_eq!(
            lines.next(),
            Some("4,1,2,Dune,Frank Herbert,Highlight,12-13,170,today,\"Fear, \"\"always\"\" fear.\",false,false,false,0,7;9")
        );
    }

    #[test]
    fn test_json_export() {
        let clip = clipping();
        let out = to_json(&[&clip]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value[0]["id"], 4);
        assert_eq!(value[0]["kind"], "Highlight");
        assert_eq!(value[0]["duplicate_of"], 0);
        assert_eq!(value[0]["similar"], serde_json::json!([7, 9]));
    }
}
