//! Uploads and the sources created from them.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ClippingsError, ParseError, Result};
use crate::model::{ClippingId, SourceId};

/// The decoded text of one file, ready for ingestion.
#[derive(Debug, Clone)]
pub struct Upload {
    /// File name without path.
    pub filename: String,
    /// Full path the text was read from.
    pub path: PathBuf,
    /// Decoded contents.
    pub text: String,
}

impl Upload {
    /// Decode bytes that were read from `path`.
    ///
    /// Fails with [`ClippingsError::Encoding`] when the bytes are not UTF-8.
    pub fn decode(path: impl AsRef<Path>, bytes: Vec<u8>) -> Result<Self> {
        let path = path.as_ref();
        let text = String::from_utf8(bytes).map_err(|_| ClippingsError::Encoding {
            path: path.to_path_buf(),
        })?;

        Ok(Self {
            filename: file_name(path),
            path: path.to_path_buf(),
            text,
        })
    }

    /// Read and decode a file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| ClippingsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::decode(path, bytes)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// One ingested upload and the clippings parsed from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    pub id: SourceId,
    pub filename: String,
    /// The upload text as received.
    #[serde(skip)]
    pub raw_text: String,
    /// SHA-256 of the raw text.
    pub hash: String,
    /// When the upload was ingested.
    pub ingested_at: DateTime<Utc>,
    /// Non-empty fragments found in the upload.
    pub fragment_count: usize,
    /// Successfully parsed clippings, in file order. Only ever appended to.
    pub clippings: Vec<ClippingId>,
    /// Number of this source's clippings that are not soft-deleted.
    pub live_count: usize,
    /// Fragments that did not match the record grammar.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unparsed: Vec<ParseError>,
}

impl Source {
    pub(crate) fn new(id: SourceId, filename: &str, raw_text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(raw_text.as_bytes());
        let hash = format!("sha256:{:x}", hasher.finalize());

        Self {
            id,
            filename: filename.to_string(),
            raw_text: raw_text.to_string(),
            hash,
            ingested_at: Utc::now(),
            fragment_count: 0,
            clippings: Vec::new(),
            live_count: 0,
            unparsed: Vec::new(),
        }
    }

    /// Whether every fragment in the upload was parsed.
    pub fn is_clean(&self) -> bool {
        self.unparsed.is_empty()
    }

    /// Fail with the first unparsed fragment, for callers that abort rather
    /// than skip.
    pub fn ensure_clean(&self) -> Result<()> {
        match self.unparsed.first() {
            Some(err) => Err(ClippingsError::Parse(err.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseFailure;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_source_hash() {
        let a = Source::new(SourceId(0), "a.txt", "same");
        let b = Source::new(SourceId(1), "b.txt", "same");
        let c = Source::new(SourceId(2), "c.txt", "other");

        assert!(a.hash.starts_with("sha256:"));
        assert_eq!(a.hash, b.hash);
        assert_ne!(a.hash, c.hash);
        assert!(a.is_clean());
    }

    #[test]
    fn test_read_upload() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("Dune (Frank Herbert)".as_bytes()).unwrap();

        let upload = Upload::read(file.path()).unwrap();
        assert_eq!(upload.text, "Dune (Frank Herbert)");
        assert!(!upload.filename.is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let err = Upload::read("/definitely/not/here/My Clippings.txt").unwrap_err();
        assert!(err.is_read_error());
        assert!(matches!(err, ClippingsError::Io { .. }));
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let err = Upload::decode("bad.txt", vec![0xff, 0xfe, 0x00, 0xd8]).unwrap_err();
        assert!(matches!(err, ClippingsError::Encoding { .. }));
        assert!(err.is_read_error());
    }

    #[test]
    fn test_ensure_clean_reports_first_failure() {
        let mut source = Source::new(SourceId(0), "a.txt", "");
        assert!(source.ensure_clean().is_ok());

        source.unparsed.push(ParseError {
            fragment: "Not a record\nsecond line".to_string(),
            index: 3,
            reason: ParseFailure::TitleLine,
        });
        match source.ensure_clean() {
            Err(ClippingsError::Parse(err)) => {
                assert_eq!(err.index, 3);
                assert!(err.to_string().starts_with("fragment 3 ("));
                assert!(err.to_string().ends_with("\"Not a record\""));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
