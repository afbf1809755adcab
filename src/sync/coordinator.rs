//! Turns view-intent changes into store queries, latest-wins.
//!
//! Each change gets a sequence number from the [`Session`]. The coordinator decides
//! between a full listing and a search, awaits the repository, and hands the result
//! back to the session, which applies it only if no newer query was issued meanwhile.
//! Superseded calls are not cancelled on the wire; their results are dropped on arrival.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::session::{QueryTicket, Session, Settlement};
use crate::entry::{TypeFilter, ViewIntent};
use crate::error::Result;
use crate::repository::EntryRepository;

/// Result of one intent change, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The result replaced the displayed collection.
    Applied { seq: u64, count: usize },
    /// A later intent change won; this result was dropped.
    Superseded { seq: u64 },
    /// An identical query was already in flight; nothing was sent.
    Coalesced,
}

#[derive(Clone)]
pub struct QueryCoordinator {
    repository: Arc<dyn EntryRepository>,
    session: Arc<Session>,
}

impl QueryCoordinator {
    pub fn new(repository: Arc<dyn EntryRepository>, session: Arc<Session>) -> Self {
        Self {
            repository,
            session,
        }
    }

    /// Show entries matching `intent`.
    ///
    /// Errors only when this call is still the latest and it failed; the displayed
    /// collection is left as it was.
    pub async fn set_intent(&self, intent: ViewIntent) -> Result<QueryOutcome> {
        self.run_ticket(self.begin_intent(intent)).await
    }

    /// Change only the search term, keeping the current type filter.
    pub async fn set_term(&self, term: &str) -> Result<QueryOutcome> {
        self.run_ticket(self.begin_term(term)).await
    }

    /// Change only the type filter, keeping the current search term.
    pub async fn set_type_filter(&self, filter: TypeFilter) -> Result<QueryOutcome> {
        self.run_ticket(self.begin_type_filter(filter)).await
    }

    /// Re-issue the current intent, even if an identical query is in flight.
    pub async fn refresh(&self) -> Result<QueryOutcome> {
        self.run_ticket(self.begin_refresh()).await
    }

    /// Take the sequence number for `intent` now, without querying yet.
    ///
    /// Callers that hand the query to another task must take the ticket first, so
    /// sequence numbers follow the order of intent changes rather than scheduling.
    /// `None` means the change coalesced with the query in flight.
    pub fn begin_intent(&self, intent: ViewIntent) -> Option<QueryTicket> {
        self.session.begin_query(intent, true)
    }

    pub fn begin_term(&self, term: &str) -> Option<QueryTicket> {
        self.session
            .begin_query_with(|current| ViewIntent::new(term, current.type_filter), true)
    }

    pub fn begin_type_filter(&self, filter: TypeFilter) -> Option<QueryTicket> {
        self.session
            .begin_query_with(|current| ViewIntent::new(&current.term, filter), true)
    }

    pub fn begin_refresh(&self) -> Option<QueryTicket> {
        self.session.begin_query_with(ViewIntent::clone, false)
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    async fn run_ticket(&self, ticket: Option<QueryTicket>) -> Result<QueryOutcome> {
        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => Ok(QueryOutcome::Coalesced),
        }
    }

    /// Query the store for a ticket taken with one of the `begin_*` methods.
    pub async fn run(&self, ticket: QueryTicket) -> Result<QueryOutcome> {
        let QueryTicket { seq, intent } = ticket;

        let result = if intent.is_full_listing() {
            debug!(seq, "listing all entries");
            self.repository.list_all().await
        } else {
            debug!(seq, term = %intent.term, filter = %intent.type_filter, "searching entries");
            self.repository.search(&intent.term, intent.type_filter).await
        };

        match self.session.settle_query(seq, result) {
            Settlement::Applied { count } => {
                info!(seq, count, "query applied");
                Ok(QueryOutcome::Applied { seq, count })
            }
            Settlement::Superseded => Ok(QueryOutcome::Superseded { seq }),
            Settlement::Failed(err) => {
                warn!(seq, error = %err, "query failed, keeping last results");
                Err(err)
            }
        }
    }
}
