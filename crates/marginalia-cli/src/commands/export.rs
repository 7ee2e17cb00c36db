//! Export command - write a view as a clippings file, CSV or JSON.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use marginalia::ExportFormat;

use super::load::{apply_changes, load_corpus};
use crate::cli::{ChangeArgs, ExportFormatChoice, ScopeArgs};

pub fn run(
    files: Vec<PathBuf>,
    strict: bool,
    scope: ScopeArgs,
    changes: ChangeArgs,
    include_deleted: bool,
    format: ExportFormatChoice,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut corpus = load_corpus(&files, None, strict)?;
    let scope = scope.scope();
    apply_changes(&mut corpus, scope, &changes)?;

    let format = ExportFormat::from(format);
    let rendered = corpus.export(scope, format, include_deleted)?;

    let Some(path) = output else {
        print!("{}", rendered);
        return Ok(());
    };

    fs::write(&path, &rendered)?;

    eprintln!(
        "{} {} ({} bytes) to {}",
        "Exported".green().bold(),
        format.extension(),
        rendered.len().to_string().white().bold(),
        path.display().to_string().white()
    );

    Ok(())
}
