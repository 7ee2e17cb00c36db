//! Similar command - find highlights that share a long run of text.

use std::path::PathBuf;

use colored::Colorize;
use marginalia::{BookId, Corpus, Scope, SimilarPair};

use super::load::load_corpus;

const SHARED_PREVIEW_CHARS: usize = 80;

pub fn run(
    files: Vec<PathBuf>,
    strict: bool,
    book: Option<u64>,
    threshold: Option<usize>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut corpus = load_corpus(&files, threshold, strict)?;

    // Scans are quadratic, so each book is scanned on its own.
    let books: Vec<BookId> = match book {
        Some(id) => vec![BookId(id)],
        None => corpus.list_books().iter().map(|b| b.id).collect(),
    };

    let mut pairs = Vec::new();
    for id in books {
        pairs.extend(corpus.scan_similar(Scope::Book(id))?);
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&pairs)?);
        return Ok(());
    }

    println!(
        "{} threshold {} characters",
        "Similarity scan,".cyan().bold(),
        corpus.config().similarity_threshold.to_string().white()
    );
    println!();

    if pairs.is_empty() {
        println!("{}", "No similar clippings found.".green());
        return Ok(());
    }

    for pair in &pairs {
        print_pair(&corpus, pair);
    }

    println!();
    println!(
        "{} {}",
        pairs.len().to_string().white().bold(),
        "similar pairs".yellow()
    );

    Ok(())
}

fn print_pair(corpus: &Corpus, pair: &SimilarPair) {
    let title = corpus
        .clipping(pair.first)
        .map(|c| c.title.as_str())
        .unwrap_or_default();

    println!(
        "  {} ~ {}  {} {}",
        pair.first.to_string().white().bold(),
        pair.second.to_string().white().bold(),
        title.dimmed(),
        format!("({} chars)", pair.run.len()).cyan()
    );

    let shared: String = pair.run.shared.chars().take(SHARED_PREVIEW_CHARS).collect();
    let ellipsis = if pair.run.len() > SHARED_PREVIEW_CHARS { "..." } else { "" };
    println!("      \"{}{}\"", shared, ellipsis);
}
