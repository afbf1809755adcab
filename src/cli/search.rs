use anyhow::{Context, Result};
use babel::config::BabelConfig;
use babel::entry::{TypeFilter, ViewIntent};

/// Print the whole collection.
pub async fn list(config: &BabelConfig) -> Result<()> {
    show(config, ViewIntent::default()).await
}

/// Print entries matching `term` and `filter`.
pub async fn search(config: &BabelConfig, term: &str, filter: TypeFilter) -> Result<()> {
    show(config, ViewIntent::new(term, filter)).await
}

async fn show(config: &BabelConfig, intent: ViewIntent) -> Result<()> {
    let library = super::connect(config)?;

    library
        .queries
        .set_intent(intent)
        .await
        .context("failed to load entries")?;

    library.session.with_store(|store| {
        if store.is_empty() {
            println!("No entries found.");
            return;
        }

        println!("Found {} entr{}\n", store.len(), if store.len() == 1 { "y" } else { "ies" });
        super::print_entries(store.entries(), config.display.preview_chars);
    });

    Ok(())
}
