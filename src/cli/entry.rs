//! CLI `add`, `edit`, and `delete` commands.

use anyhow::{bail, Context, Result};
use babel::config::BabelConfig;
use babel::entry::{EntryDraft, EntryId, EntryType};
use chrono::NaiveDate;
use clap::Args;

/// Entry fields accepted on the command line. An empty value clears an optional field.
#[derive(Args, Debug, Default)]
pub struct EntryFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Where you came across it
    #[arg(long)]
    pub source: Option<String>,
    /// Why it stuck with you
    #[arg(long)]
    pub why: Option<String>,
    /// Longer elaboration
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Repeat for several tags; replaces existing tags on edit
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long)]
    pub batch: Option<String>,
    /// Date added (YYYY-MM-DD); defaults to today. Edits keep the original date
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

fn non_blank(value: String) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty())
}

impl EntryFields {
    /// Overlay the given fields onto `draft`, leaving the rest untouched.
    pub fn apply_to(self, draft: &mut EntryDraft) {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(content) = self.content {
            draft.content = content;
        }
        let optional = [
            (self.source, &mut draft.source),
            (self.why, &mut draft.why_it_stuck),
            (self.note, &mut draft.extended_note),
            (self.category, &mut draft.category),
            (self.batch, &mut draft.batch),
        ];
        for (value, slot) in optional {
            if let Some(value) = value {
                *slot = non_blank(value);
            }
        }
        if !self.tags.is_empty() {
            draft.tags = self.tags;
        }
        if self.date.is_some() {
            draft.date_added = self.date;
        }
    }
}

/// Create an entry from command-line fields.
pub async fn add(config: &BabelConfig, entry_type: EntryType, fields: EntryFields) -> Result<()> {
    let mut draft = EntryDraft::new(entry_type, String::new(), String::new());
    fields.apply_to(&mut draft);

    let library = super::connect(config)?;
    let entry = library
        .mutations
        .submit_create(&draft)
        .await
        .context("failed to create entry")?;

    println!("Created entry:");
    super::print_entry(&entry);
    Ok(())
}

/// Merge command-line fields into an existing entry and submit the update.
pub async fn edit(
    config: &BabelConfig,
    id: &str,
    entry_type: Option<EntryType>,
    fields: EntryFields,
) -> Result<()> {
    let id = EntryId::from(id);
    let library = super::connect(config)?;

    library
        .queries
        .refresh()
        .await
        .context("failed to load entries")?;

    let Some(current) = library.session.get(&id) else {
        bail!("entry not found: {id}");
    };

    let mut draft = current.to_draft();
    if let Some(entry_type) = entry_type {
        draft.entry_type = entry_type;
    }
    fields.apply_to(&mut draft);

    if draft == current.to_draft() {
        println!("Nothing to change.");
        return Ok(());
    }

    let entry = library
        .mutations
        .submit_update(&id, &draft)
        .await
        .context("failed to update entry")?;

    println!("Updated entry:");
    super::print_entry(&entry);
    Ok(())
}

/// Delete an entry after asking the user, unless `yes` is set.
pub async fn delete(config: &BabelConfig, id: &str, yes: bool) -> Result<()> {
    let id = EntryId::from(id);
    let library = super::connect(config)?;

    if !yes {
        // Best effort: show what is about to go, but allow deleting unseen ids.
        if let Err(e) = library.queries.refresh().await {
            tracing::warn!(error = %e, "could not load entries for confirmation");
        }
        match library.session.get(&id) {
            Some(entry) => super::print_entry(&entry),
            None => println!("Entry {id} is not in the current listing."),
        }
        if !super::confirm("Permanently delete this entry?")? {
            bail!("delete cancelled");
        }
    }

    library
        .mutations
        .submit_delete(&id)
        .await
        .with_context(|| format!("failed to delete entry {id}"))?;

    println!("Deleted entry {id}.");
    Ok(())
}
