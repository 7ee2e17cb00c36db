//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use marginalia::{BookId, ClippingId, ExportFormat, Scope, SourceId};

/// Marginalia: curate e-reader clippings exports
#[derive(Parser)]
#[command(name = "marginalia")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Fail on the first record that does not parse instead of skipping it
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize the corpus built from one or more exports
    Status {
        /// Clippings export files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List books sorted by title
    Books {
        /// Clippings export files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the clippings of a view
    List {
        /// Clippings export files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        changes: ChangeArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find highlights that share a long run of text
    Similar {
        /// Clippings export files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Only scan this book (default: every book separately)
        #[arg(long, value_name = "BOOK_ID")]
        book: Option<u64>,

        /// Minimum shared run, in characters
        #[arg(short, long)]
        threshold: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a view back out as a clippings file, CSV or JSON
    Export {
        /// Clippings export files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        scope: ScopeArgs,

        #[command(flatten)]
        changes: ChangeArgs,

        /// Keep soft-deleted clippings in the output
        #[arg(long)]
        include_deleted: bool,

        /// Output format
        #[arg(short, long, default_value = "clippings")]
        format: ExportFormatChoice,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Which view of the corpus to operate on. Defaults to every live clipping.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct ScopeArgs {
    /// Clippings of one book
    #[arg(long, value_name = "BOOK_ID")]
    pub book: Option<u64>,

    /// Clippings of one input file, numbered in load order
    #[arg(long, value_name = "SOURCE_ID")]
    pub source: Option<u64>,

    /// Marked clippings
    #[arg(long)]
    pub marked: bool,

    /// Exact duplicates of earlier clippings
    #[arg(long)]
    pub duplicates: bool,

    /// Soft-deleted clippings
    #[arg(long)]
    pub deleted: bool,
}

impl ScopeArgs {
    pub fn scope(&self) -> Scope {
        if let Some(id) = self.book {
            Scope::Book(BookId(id))
        } else if let Some(id) = self.source {
            Scope::Source(SourceId(id))
        } else if self.marked {
            Scope::Marked
        } else if self.duplicates {
            Scope::Duplicates
        } else if self.deleted {
            Scope::Deleted
        } else {
            Scope::All
        }
    }
}

/// Lifecycle changes applied to the loaded corpus before it is shown.
#[derive(Args, Debug, Clone, Default)]
pub struct ChangeArgs {
    /// Soft-delete exact duplicates in the selected view
    #[arg(long)]
    pub drop_duplicates: bool,

    /// Mark clippings
    #[arg(long, value_name = "ID", num_args = 1..)]
    pub mark: Vec<u64>,

    /// Soft-delete clippings
    #[arg(long, value_name = "ID", num_args = 1..)]
    pub delete: Vec<u64>,

    /// Replace a clipping's text
    #[arg(long, value_name = "ID=TEXT", value_parser = parse_edit)]
    pub edit: Vec<(ClippingId, String)>,
}

fn parse_edit(raw: &str) -> Result<(ClippingId, String), String> {
    let (id, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=TEXT, got '{}'", raw))?;
    let id: u64 = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid clipping id '{}'", id))?;
    Ok((ClippingId(id), text.to_string()))
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormatChoice {
    /// Clippings file, re-importable
    Clippings,
    /// Comma-separated values
    Csv,
    /// JSON array
    Json,
}

impl From<ExportFormatChoice> for ExportFormat {
    fn from(choice: ExportFormatChoice) -> Self {
        match choice {
            ExportFormatChoice::Clippings => ExportFormat::Clippings,
            ExportFormatChoice::Csv => ExportFormat::Csv,
            ExportFormatChoice::Json => ExportFormat::Json,
        }
    }
}
