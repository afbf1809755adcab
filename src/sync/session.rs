//! Client-side state shared by the query coordinator and the mutation orchestrator.
//!
//! A [`Session`] owns three things behind one lock:
//!
//! - the [`CollectionStore`] being displayed,
//! - the query ledger: the highest sequence number issued, its intent, and whether it
//!   has settled,
//! - the journal of mutations confirmed while the latest query is still in flight.
//!
//! A query result is applied only if its sequence number is the latest issued. When it
//! is applied, journaled confirmations are replayed on top of the fresh snapshot: the
//! snapshot was taken before those mutations landed, so without the replay a deleted
//! entry could reappear or a created one vanish. The journal is cleared whenever a new
//! query is issued, since that query observes every mutation confirmed before it.
//!
//! The lock is never held across an `.await`; every method here is synchronous.

use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::store::CollectionStore;
use crate::entry::{Entry, EntryId, ViewIntent};
use crate::error::BabelError;

/// A locally confirmed mutation, as applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Created(Entry),
    Updated(Entry),
    Deleted(EntryId),
}

/// Permission to run one query, stamped with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTicket {
    pub seq: u64,
    pub intent: ViewIntent,
}

/// What happened when a query's result reached the session.
#[derive(Debug)]
pub enum Settlement {
    /// Latest query succeeded; the store now holds `count` entries.
    Applied { count: usize },
    /// A later query was issued meanwhile; the result was dropped.
    Superseded,
    /// Latest query failed; the store was left as it was.
    Failed(BabelError),
}

#[derive(Debug, Default)]
struct QueryLedger {
    issued: u64,
    intent: ViewIntent,
    settled: bool,
    applied: Option<u64>,
}

#[derive(Debug, Default)]
struct SessionState {
    store: CollectionStore,
    ledger: QueryLedger,
    journal: Vec<Confirmation>,
}

/// Owned context for one client session. Share it with `Arc`.
#[derive(Debug, Default)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // Transitions cannot panic halfway, so a poisoned guard still holds whole state.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Issue the next sequence number for `intent`.
    ///
    /// With `coalesce`, returns `None` when `intent` equals the latest intent and that
    /// query has not settled yet.
    pub fn begin_query(&self, intent: ViewIntent, coalesce: bool) -> Option<QueryTicket> {
        self.begin_query_with(|_| intent, coalesce)
    }

    /// Like [`begin_query`](Self::begin_query), with the intent derived from the
    /// latest one under the same lock, so a partial change (term only, filter only)
    /// can never merge with a stale other half.
    pub fn begin_query_with(
        &self,
        next: impl FnOnce(&ViewIntent) -> ViewIntent,
        coalesce: bool,
    ) -> Option<QueryTicket> {
        let mut state = self.lock();
        let intent = next(&state.ledger.intent);

        if coalesce
            && state.ledger.issued > 0
            && !state.ledger.settled
            && state.ledger.intent == intent
        {
            debug!(seq = state.ledger.issued, "intent unchanged, query already in flight");
            return None;
        }

        state.ledger.issued += 1;
        state.ledger.intent = intent.clone();
        state.ledger.settled = false;
        state.journal.clear();

        Some(QueryTicket {
            seq: state.ledger.issued,
            intent,
        })
    }

    /// Deliver the result of query `seq`.
    pub fn settle_query(
        &self,
        seq: u64,
        result: Result<Vec<Entry>, BabelError>,
    ) -> Settlement {
        let mut state = self.lock();

        if seq != state.ledger.issued {
            debug!(seq, latest = state.ledger.issued, "discarding superseded query result");
            return Settlement::Superseded;
        }

        state.ledger.settled = true;
        match result {
            Ok(entries) => {
                let SessionState { store, ledger, journal } = &mut *state;
                store.replace_all(entries);
                for confirmation in journal.drain(..) {
                    apply(store, confirmation);
                }
                ledger.applied = Some(seq);
                Settlement::Applied { count: store.len() }
            }
            Err(err) => Settlement::Failed(err),
        }
    }

    /// Apply a confirmed mutation, journaling it if a query is in flight.
    pub fn confirm(&self, confirmation: Confirmation) {
        let mut state = self.lock();
        if state.ledger.issued > 0 && !state.ledger.settled {
            state.journal.push(confirmation.clone());
        }
        apply(&mut state.store, confirmation);
    }

    /// Clone of the displayed entries.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().store.entries().to_vec()
    }

    /// Read the store without cloning it.
    pub fn with_store<R>(&self, f: impl FnOnce(&CollectionStore) -> R) -> R {
        f(&self.lock().store)
    }

    pub fn get(&self, id: &EntryId) -> Option<Entry> {
        self.lock().store.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().store.is_empty()
    }

    /// Intent of the most recently issued query.
    pub fn intent(&self) -> ViewIntent {
        self.lock().ledger.intent.clone()
    }

    /// Highest sequence number issued so far (0 before the first query).
    pub fn latest_seq(&self) -> u64 {
        self.lock().ledger.issued
    }

    /// Sequence number of the query whose result the store is based on.
    pub fn applied_seq(&self) -> Option<u64> {
        self.lock().ledger.applied
    }

    /// `true` while the latest query has not settled.
    pub fn is_loading(&self) -> bool {
        let state = self.lock();
        state.ledger.issued > 0 && !state.ledger.settled
    }
}

fn apply(store: &mut CollectionStore, confirmation: Confirmation) {
    match confirmation {
        Confirmation::Created(entry) => store.insert_one(entry),
        Confirmation::Updated(entry) => {
            store.replace_one(entry);
        }
        Confirmation::Deleted(id) => {
            store.remove_one(&id);
        }
    }
}
