pub mod browse;
pub mod doctor;
pub mod entry;
pub mod export;
pub mod import;
pub mod search;
pub mod stats;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use babel::config::BabelConfig;
use babel::entry::Entry;
use babel::sync::Library;

/// Wire a fresh session to the configured store.
pub fn connect(config: &BabelConfig) -> Result<Library> {
    let repository = babel::repository::create_repository(&config.remote)?;
    Ok(Library::new(Arc::from(repository)))
}

/// Ask a yes/no question on the terminal. Anything but `y`/`yes` means no.
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N]: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(is_yes(&input))
}

pub fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Cut `text` to `max_chars` characters, marking the cut with `...`.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn print_entries(entries: &[Entry], preview_chars: usize) {
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {}. [{}] {} (id {}, added {})",
            i + 1,
            entry.entry_type,
            entry.title,
            entry.id,
            entry.date_added,
        );
        println!("     {}", preview(&entry.content, preview_chars));
        if !entry.tags.is_empty() {
            println!("     tags: {}", entry.tags.join(", "));
        }
        println!();
    }
}

/// Full detail of one entry, for confirmations and edit results.
pub fn print_entry(entry: &Entry) {
    println!("[{}] {}  (id {})", entry.entry_type, entry.title, entry.id);
    println!("  {}", entry.content);
    let optional = [
        ("Source", &entry.source),
        ("Why it stuck", &entry.why_it_stuck),
        ("Note", &entry.extended_note),
        ("Category", &entry.category),
        ("Batch", &entry.batch),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            println!("  {label}: {value}");
        }
    }
    if !entry.tags.is_empty() {
        println!("  Tags: {}", entry.tags.join(", "));
    }
    println!("  Added: {}", entry.date_added);
}
