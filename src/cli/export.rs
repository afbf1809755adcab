use anyhow::{Context, Result};
use babel::config::BabelConfig;
use babel::entry::Entry;
use serde::Serialize;

/// Export format: the full listing plus when it was taken. `import` reads it back.
#[derive(Debug, Serialize)]
struct ExportData {
    exported_at: String,
    entries: Vec<Entry>,
}

/// Export all entries as JSON to stdout.
pub async fn export(config: &BabelConfig) -> Result<()> {
    let library = super::connect(config)?;

    library
        .queries
        .refresh()
        .await
        .context("failed to load entries")?;

    let data = ExportData {
        exported_at: chrono::Utc::now().to_rfc3339(),
        entries: library.session.entries(),
    };

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} entries.", data.entries.len());

    Ok(())
}
