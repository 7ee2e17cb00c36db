//! Marginalia CLI - curate e-reader clippings exports.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let strict = cli.strict;

    let result = match cli.command {
        Commands::Status { files, json } => commands::status::run(files, strict, json),

        Commands::Books { files, json } => commands::books::run(files, strict, json),

        Commands::List {
            files,
            scope,
            changes,
            json,
        } => commands::list::run(files, strict, scope, changes, json),

        Commands::Similar {
            files,
            book,
            threshold,
            json,
        } => commands::similar::run(files, strict, book, threshold, json),

        Commands::Export {
            files,
            scope,
            changes,
            include_deleted,
            format,
            output,
        } => commands::export::run(
            files,
            strict,
            scope,
            changes,
            include_deleted,
            format,
            output,
        ),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level chosen by `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
