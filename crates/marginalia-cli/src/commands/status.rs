//! Status command - summarize the loaded corpus.

use std::path::PathBuf;

use colored::Colorize;

use super::load::load_corpus;

pub fn run(
    files: Vec<PathBuf>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = load_corpus(&files, None, strict)?;
    let summary = corpus.summary();

    if json_output {
        let status = serde_json::json!({
            "summary": summary,
            "sources": corpus.sources(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {} file(s)",
        "Clippings corpus from".cyan().bold(),
        summary.sources.to_string().white()
    );
    println!();

    println!(
        "Clippings: {} ({} live)",
        summary.clippings.to_string().white().bold(),
        summary.live
    );
    println!("Books:     {}", summary.books.to_string().white().bold());
    println!();

    println!("{}", "By kind:".white().bold());
    println!("  {} {}", "Highlights:".green(), summary.by_kind.highlight);
    println!("  {} {}", "Notes:     ".blue(), summary.by_kind.note);
    println!("  {} {}", "Bookmarks: ".dimmed(), summary.by_kind.bookmark);
    println!();

    println!("{}", "Curation:".white().bold());
    println!("  {} {}", "Duplicates:".yellow(), summary.duplicates);
    println!("  {} {}", "Similar:   ".yellow(), summary.similar);
    println!("  {} {}", "Marked:    ".cyan(), summary.marked);
    println!("  {} {}", "Edited:    ".cyan(), summary.edited);
    println!("  {} {}", "Deleted:   ".red(), summary.deleted);
    println!();

    println!("{}", "Sources:".white().bold());
    for source in corpus.sources() {
        let health = if source.is_clean() {
            "ok".green()
        } else {
            format!("{} unparsed", source.unparsed.len()).yellow()
        };
        println!(
            "  [{}] {} - {} clippings, {} fragments ({})",
            source.id,
            source.filename.white(),
            source.clippings.len(),
            source.fragment_count,
            health
        );
        for failure in &source.unparsed {
            println!("      {}", failure.to_string().dimmed());
        }
    }

    if summary.unparsed_fragments > 0 {
        println!();
        println!(
            "{} {} fragment(s) could not be parsed and were skipped.",
            "Warning:".yellow().bold(),
            summary.unparsed_fragments
        );
    }

    Ok(())
}
