//! Query synchronization and mutation reconciliation.

pub mod coordinator;
pub mod mutation;
pub mod session;
pub mod store;

use std::sync::Arc;

use crate::repository::EntryRepository;

pub use coordinator::{QueryCoordinator, QueryOutcome};
pub use mutation::MutationOrchestrator;
pub use session::{QueryTicket, Session};
pub use store::CollectionStore;

/// A session wired to one repository: the pieces a front end needs.
#[derive(Clone)]
pub struct Library {
    pub session: Arc<Session>,
    pub queries: QueryCoordinator,
    pub mutations: MutationOrchestrator,
}

impl Library {
    pub fn new(repository: Arc<dyn EntryRepository>) -> Self {
        let session = Arc::new(Session::new());
        Self {
            queries: QueryCoordinator::new(Arc::clone(&repository), Arc::clone(&session)),
            mutations: MutationOrchestrator::new(repository, Arc::clone(&session)),
            session,
        }
    }
}
