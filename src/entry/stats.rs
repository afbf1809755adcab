//! Collection statistics: counts by type, category, and batch.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::types::{Entry, EntryType};

/// Summary of a set of entries.
#[derive(Debug, Serialize)]
pub struct EntryStats {
    pub total_entries: usize,
    /// Every type is present, possibly with zero, iterated in display order.
    pub by_type: BTreeMap<EntryType, usize>,
    /// Entries without a category are not counted here.
    pub by_category: BTreeMap<String, usize>,
    pub by_batch: BTreeMap<String, usize>,
    /// Entries carrying at least one tag.
    pub tagged_entries: usize,
    pub oldest_entry: Option<NaiveDate>,
    pub newest_entry: Option<NaiveDate>,
}

pub fn entry_stats(entries: &[Entry]) -> EntryStats {
    let mut by_type: BTreeMap<EntryType, usize> =
        EntryType::ALL.iter().map(|&t| (t, 0)).collect();
    let mut by_category = BTreeMap::new();
    let mut by_batch = BTreeMap::new();

    for entry in entries {
        *by_type.entry(entry.entry_type).or_insert(0) += 1;
        if let Some(category) = &entry.category {
            *by_category.entry(category.clone()).or_insert(0) += 1;
        }
        if let Some(batch) = &entry.batch {
            *by_batch.entry(batch.clone()).or_insert(0) += 1;
        }
    }

    EntryStats {
        total_entries: entries.len(),
        by_type,
        by_category,
        by_batch,
        tagged_entries: entries.iter().filter(|e| !e.tags.is_empty()).count(),
        oldest_entry: entries.iter().map(|e| e.date_added).min(),
        newest_entry: entries.iter().map(|e| e.date_added).max(),
    }
}
