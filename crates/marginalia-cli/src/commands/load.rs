//! Building the corpus from the files named on the command line.

use std::path::PathBuf;

use marginalia::{ClippingId, ClippingsError, Corpus, CorpusConfig, Scope, Upload};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::cli::ChangeArgs;

/// Read every file concurrently and ingest them in completion order.
///
/// Unreadable files are reported and skipped; the command fails only when
/// none of them could be read. With `strict`, the first record that does not
/// parse fails the command.
pub fn load_corpus(
    files: &[PathBuf],
    threshold: Option<usize>,
    strict: bool,
) -> Result<Corpus, Box<dyn std::error::Error>> {
    let mut config = CorpusConfig::new();
    if let Some(threshold) = threshold {
        config = config.with_similarity_threshold(threshold);
    }
    let mut corpus = Corpus::with_config(config)?;

    let runtime = tokio::runtime::Runtime::new()?;
    let uploads = runtime.block_on(read_all(files.to_vec()));

    let mut failures = 0;
    for upload in uploads {
        match upload {
            Ok(upload) => {
                let source = corpus.ingest_upload(&upload);
                debug!(
                    source = %source.id,
                    file = %upload.path.display(),
                    clippings = source.clippings.len(),
                    "loaded"
                );
                if strict {
                    source.ensure_clean().map_err(|e| {
                        format!("{}: {}", upload.path.display(), e)
                    })?;
                }
            }
            Err(e) => {
                warn!("skipping unreadable input: {}", e);
                failures += 1;
            }
        }
    }

    if corpus.sources().is_empty() && failures > 0 {
        return Err("none of the input files could be read".into());
    }

    Ok(corpus)
}

async fn read_all(files: Vec<PathBuf>) -> Vec<marginalia::Result<Upload>> {
    let mut tasks = JoinSet::new();
    for path in files {
        tasks.spawn(async move {
            let bytes = tokio::fs::read(&path)
                .await
                .map_err(|source| ClippingsError::Io {
                    path: path.clone(),
                    source,
                })?;
            Upload::decode(&path, bytes)
        });
    }

    let mut uploads = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(upload) => uploads.push(upload),
            Err(e) => warn!("read task failed: {}", e),
        }
    }
    uploads
}

/// Apply the lifecycle flags shared by `list` and `export`.
pub fn apply_changes(
    corpus: &mut Corpus,
    scope: Scope,
    changes: &ChangeArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if changes.drop_duplicates {
        let dropped = corpus.delete_duplicates(scope)?;
        debug!(dropped, "dropped duplicates");
    }
    for id in &changes.mark {
        corpus.mark(ClippingId(*id))?;
    }
    for id in &changes.delete {
        corpus.delete(ClippingId(*id))?;
    }
    for (id, text) in &changes.edit {
        corpus.edit(*id, text.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const EXPORT: &str = "Dune (Frank Herbert)\r\n- Your Highlight on page 1 | Added on Friday, 5 July 2024\r\n\r\nFear is the mind-killer.\r\n==========\r\n";

    fn export_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".txt").unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_load_skips_unreadable_files() {
        let good = export_file(EXPORT.as_bytes());
        let bad = export_file(&[0xff, 0xfe, 0x00]);

        let files = vec![
            good.path().to_path_buf(),
            bad.path().to_path_buf(),
            PathBuf::from("/nonexistent/My Clippings.txt"),
        ];
        let corpus = load_corpus(&files, None, false).unwrap();

        assert_eq!(corpus.sources().len(), 1);
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn test_load_fails_when_nothing_readable() {
        let files = vec![PathBuf::from("/nonexistent/My Clippings.txt")];
        assert!(load_corpus(&files, None, false).is_err());
    }

    #[test]
    fn test_load_rejects_zero_threshold() {
        let good = export_file(EXPORT.as_bytes());
        assert!(load_corpus(&[good.path().to_path_buf()], Some(0), false).is_err());
    }

    #[test]
    fn test_strict_load_fails_on_unparsed_record() {
        let broken = format!("{}Not a record\r\n==========\r\n", EXPORT);
        let file = export_file(broken.as_bytes());
        let files = vec![file.path().to_path_buf()];

        let corpus = load_corpus(&files, None, false).unwrap();
        assert_eq!(corpus.len(), 1);

        let err = load_corpus(&files, None, true).unwrap_err();
        assert!(err.to_string().contains("fragment 1"));
    }

    #[test]
    fn test_apply_changes() {
        let good = export_file(EXPORT.repeat(2).as_bytes());
        let mut corpus = load_corpus(&[good.path().to_path_buf()], None, false).unwrap();

        let changes = ChangeArgs {
            drop_duplicates: true,
            edit: vec![(ClippingId(0), "Fear.".to_string())],
            ..ChangeArgs::default()
        };
        apply_changes(&mut corpus, Scope::All, &changes).unwrap();

        assert!(corpus.clipping(ClippingId(1)).unwrap().deleted);
        assert_eq!(corpus.clipping(ClippingId(0)).unwrap().effective_text(), "Fear.");
    }
}
