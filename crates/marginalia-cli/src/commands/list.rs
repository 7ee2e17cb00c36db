//! List command - show the clippings of a view.

use std::path::PathBuf;

use colored::Colorize;
use marginalia::{Clipping, ClippingKind};

use super::load::{apply_changes, load_corpus};
use crate::cli::{ChangeArgs, ScopeArgs};

const PREVIEW_CHARS: usize = 100;

pub fn run(
    files: Vec<PathBuf>,
    strict: bool,
    scope: ScopeArgs,
    changes: ChangeArgs,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut corpus = load_corpus(&files, None, strict)?;
    let scope = scope.scope();
    apply_changes(&mut corpus, scope, &changes)?;

    let clippings = corpus.get_clippings(scope)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&clippings)?);
        return Ok(());
    }

    if clippings.is_empty() {
        println!("{}", "No clippings in this view.".yellow());
        return Ok(());
    }

    for clipping in &clippings {
        print_clipping(clipping);
    }

    println!();
    println!(
        "{} {}",
        clippings.len().to_string().white().bold(),
        "clippings".cyan()
    );

    Ok(())
}

fn print_clipping(clipping: &Clipping) {
    let kind = match clipping.kind {
        ClippingKind::Highlight => clipping.kind.label().green(),
        ClippingKind::Note => clipping.kind.label().blue(),
        ClippingKind::Bookmark => clipping.kind.label().dimmed(),
    };

    let mut position = Vec::new();
    if let Some(pages) = clipping.pages() {
        position.push(format!("p. {}", pages));
    }
    if let Some(locations) = clipping.locations() {
        position.push(format!("loc. {}", locations));
    }

    let mut tags = Vec::new();
    if let Some(original) = clipping.duplicate_of {
        tags.push(format!("duplicate of {}", original).yellow().to_string());
    }
    if !clipping.similar.is_empty() {
        tags.push(format!("{} similar", clipping.similar.len()).yellow().to_string());
    }
    if clipping.marked {
        tags.push("marked".cyan().to_string());
    }
    if clipping.is_edited() {
        tags.push("edited".cyan().to_string());
    }
    if clipping.deleted {
        tags.push("deleted".red().to_string());
    }

    println!(
        "{:>5}  {} {} {}",
        clipping.id.0,
        kind,
        clipping.title.white().bold(),
        position.join(", ").dimmed()
    );
    if !tags.is_empty() {
        println!("       [{}]", tags.join(", "));
    }

    let text = clipping.effective_text();
    if !text.is_empty() {
        println!("       {}", preview(text));
    }
}

/// First line of the text, cut to a fixed number of characters.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut out: String = line.chars().take(PREVIEW_CHARS).collect();
    if line.chars().count() > PREVIEW_CHARS || text.lines().nth(1).is_some() {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("first\nsecond"), "first...");

        let long = "x".repeat(PREVIEW_CHARS + 5);
        assert_eq!(preview(&long).chars().count(), PREVIEW_CHARS + 3);
    }
}
