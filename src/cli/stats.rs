use anyhow::{Context, Result};
use babel::config::BabelConfig;
use babel::entry::stats::entry_stats;

/// Display collection statistics in the terminal.
pub async fn stats(config: &BabelConfig) -> Result<()> {
    let library = super::connect(config)?;
    library
        .queries
        .refresh()
        .await
        .context("failed to load entries")?;

    let response = library.session.with_store(|store| entry_stats(store.entries()));

    println!("Library Statistics");
    println!("{}", "=".repeat(40));
    println!("  Total entries:       {}", response.total_entries);
    println!("  Tagged:              {}", response.tagged_entries);
    println!();

    println!("By Type:");
    for (entry_type, count) in &response.by_type {
        println!("  {:<12} {}", entry_type.as_str(), count);
    }
    println!();

    if !response.by_category.is_empty() {
        println!("By Category:");
        for (category, count) in &response.by_category {
            println!("  {:<28} {}", category, count);
        }
        println!();
    }

    if !response.by_batch.is_empty() {
        println!("By Batch:");
        for (batch, count) in &response.by_batch {
            println!("  {:<28} {}", batch, count);
        }
        println!();
    }

    if let Some(ref oldest) = response.oldest_entry {
        println!("Oldest entry:          {oldest}");
    }
    if let Some(ref newest) = response.newest_entry {
        println!("Newest entry:          {newest}");
    }

    Ok(())
}
