//! Create, update, and delete with confirm-then-apply semantics.
//!
//! The store is patched only after the repository reports success, and never
//! re-queried. Failures leave the displayed collection untouched and are returned to
//! the caller, who still holds the draft and can retry.

use std::sync::Arc;

use tracing::info;

use super::session::{Confirmation, Session};
use crate::entry::{Entry, EntryDraft, EntryId};
use crate::error::Result;
use crate::repository::EntryRepository;

#[derive(Clone)]
pub struct MutationOrchestrator {
    repository: Arc<dyn EntryRepository>,
    session: Arc<Session>,
}

impl MutationOrchestrator {
    pub fn new(repository: Arc<dyn EntryRepository>, session: Arc<Session>) -> Self {
        Self {
            repository,
            session,
        }
    }

    /// Validate and create `draft`, then prepend the stored entry.
    pub async fn submit_create(&self, draft: &EntryDraft) -> Result<Entry> {
        draft.validate()?;

        let entry = self.repository.create(draft).await?;
        info!(id = %entry.id, entry_type = %entry.entry_type, "entry created");

        self.session.confirm(Confirmation::Created(entry.clone()));
        Ok(entry)
    }

    /// Validate and update entry `id`, then replace it where it is shown.
    ///
    /// The displayed entry's `date_added` overrides the draft's, so edits never move it.
    pub async fn submit_update(&self, id: &EntryId, draft: &EntryDraft) -> Result<Entry> {
        draft.validate()?;

        let mut payload = draft.clone();
        if let Some(shown) = self.session.get(id) {
            payload.date_added = Some(shown.date_added);
        }

        let entry = self.repository.update(id, &payload).await?;
        info!(id = %entry.id, "entry updated");

        self.session.confirm(Confirmation::Updated(entry.clone()));
        Ok(entry)
    }

    /// Delete entry `id`, then drop it from the display.
    ///
    /// Callers are expected to have asked the user first.
    pub async fn submit_delete(&self, id: &EntryId) -> Result<()> {
        self.repository.delete(id).await?;
        info!(id = %id, "entry deleted");

        self.session.confirm(Confirmation::Deleted(id.clone()));
        Ok(())
    }
}
