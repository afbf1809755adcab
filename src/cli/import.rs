use anyhow::{Context, Result};
use babel::config::BabelConfig;
use babel::entry::parser::parse_unstructured;
use babel::entry::EntryDraft;
use babel::BabelError;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::Path;

/// Import format: a bare array of drafts, or the `export` output.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportData {
    Drafts(Vec<EntryDraft>),
    Export { entries: Vec<EntryDraft> },
}

impl ImportData {
    fn into_drafts(self) -> Vec<EntryDraft> {
        match self {
            Self::Drafts(drafts) | Self::Export { entries: drafts } => drafts,
        }
    }
}

/// Read drafts from `file`, as JSON or (with `smart`) as free-form notes.
fn read_drafts(file: &Path, smart: bool) -> Result<Vec<EntryDraft>> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    if smart {
        let today = chrono::Local::now().date_naive();
        return Ok(parse_unstructured(&text, today));
    }

    let data: ImportData = serde_json::from_str(&text).context("failed to parse import JSON")?;
    Ok(data.into_drafts())
}

/// Create every draft in `file` through the mutation path.
///
/// Drafts are submitted one at a time; invalid ones are skipped locally and store
/// failures are counted, so one bad record never stops the import. Ids in the file
/// are ignored, the store assigns new ones.
pub async fn import(
    config: &BabelConfig,
    file: &Path,
    smart: bool,
    batch: Option<&str>,
) -> Result<()> {
    let mut drafts = read_drafts(file, smart)?;
    if let Some(batch) = batch {
        for draft in &mut drafts {
            draft.batch = Some(batch.to_string());
        }
    }

    if drafts.is_empty() {
        println!("Nothing to import.");
        return Ok(());
    }

    let library = super::connect(config)?;

    println!("Importing {} entries...", drafts.len());

    let pb = ProgressBar::new(drafts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("valid template")
            .progress_chars("##-"),
    );

    let mut imported = 0u64;
    let mut invalid = 0u64;
    let mut failed = 0u64;

    for draft in &drafts {
        pb.set_message(super::preview(&draft.title, 40));
        match library.mutations.submit_create(draft).await {
            Ok(_) => imported += 1,
            Err(BabelError::Validation(reason)) => {
                invalid += 1;
                pb.println(format!("  skipped \"{}\": {reason}", super::preview(&draft.title, 40)));
            }
            Err(e) => {
                failed += 1;
                pb.println(format!("  failed \"{}\": {e}", super::preview(&draft.title, 40)));
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    println!("Import complete:");
    println!("  Entries imported: {imported}");
    if invalid > 0 {
        println!("  Entries skipped:  {invalid} (missing title or content)");
    }
    if failed > 0 {
        println!("  Entries failed:   {failed}");
    }

    Ok(())
}
