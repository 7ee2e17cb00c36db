//! Books command - list books sorted by title.

use std::path::PathBuf;

use colored::Colorize;

use super::load::load_corpus;

pub fn run(
    files: Vec<PathBuf>,
    strict: bool,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = load_corpus(&files, None, strict)?;
    let books = corpus.list_books();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&books)?);
        return Ok(());
    }

    if books.is_empty() {
        println!("{}", "No books found.".yellow());
        return Ok(());
    }

    println!(
        "{} {}",
        books.len().to_string().white().bold(),
        "books".cyan().bold()
    );
    println!();

    for book in books {
        let counts = if book.live_count == book.clippings.len() {
            book.live_count.to_string()
        } else {
            format!("{}/{}", book.live_count, book.clippings.len())
        };
        println!(
            "  [{:>3}] {} {} {}",
            book.id.0,
            book.title.white().bold(),
            format!("({})", book.author).dimmed(),
            format!("{} clippings", counts).cyan()
        );
    }

    Ok(())
}
