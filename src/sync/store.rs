//! The reconciled list of entries currently shown to the user.
//!
//! Only four transitions exist. Each runs to completion without yielding, and the
//! [`Session`](super::session::Session) applies them under its lock.

use crate::entry::{Entry, EntryId};

/// Ordered entries, newest first.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectionStore {
    entries: Vec<Entry>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in the result of an applied query.
    pub fn replace_all(&mut self, entries: Vec<Entry>) {
        self.entries = entries;
    }

    /// Prepend a created entry. An entry already present under the same id is
    /// replaced in place instead, so an entry never shows twice.
    pub fn insert_one(&mut self, entry: Entry) {
        match self.position(&entry.id) {
            Some(index) => self.entries[index] = entry,
            None => self.entries.insert(0, entry),
        }
    }

    /// Replace the entry with the same id. Returns `false` if it is not shown.
    pub fn replace_one(&mut self, entry: Entry) -> bool {
        match self.position(&entry.id) {
            Some(index) => {
                self.entries[index] = entry;
                true
            }
            None => false,
        }
    }

    /// Drop the entry with `id`. Returns `false` if it is not shown.
    pub fn remove_one(&mut self, id: &EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        self.entries.len() != before
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }
}
