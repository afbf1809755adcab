#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use babel::entry::{Entry, EntryDraft, EntryId, EntryType, TypeFilter};
use babel::repository::{EntryRepository, StoreStatus};
use babel::sync::Library;
use babel::{BabelError, Result};
use chrono::NaiveDate;
use tokio::sync::oneshot;

/// Date the fake store stamps on entries created without one.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Build a stored entry with just the required fields.
pub fn entry(id: &str, entry_type: EntryType, title: &str, content: &str) -> Entry {
    Entry {
        id: EntryId::from(id),
        entry_type,
        title: title.to_string(),
        content: content.to_string(),
        source: None,
        why_it_stuck: None,
        extended_note: None,
        category: None,
        tags: Vec::new(),
        batch: None,
        date_added: date(2025, 1, 15),
    }
}

pub fn ids(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(|e| e.id.to_string()).collect()
}

/// In-memory entry store with scripted latency and failures.
///
/// `list_all` and `search` compute their answer when called, then wait for the next
/// queued gate (if any) before returning it, so a test can hold a query in flight
/// while other calls proceed.
#[derive(Default)]
pub struct FakeRepository {
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicU64,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    query_failures: Mutex<VecDeque<BabelError>>,
    write_failures: Mutex<VecDeque<BabelError>>,
    list_calls: AtomicUsize,
    search_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl FakeRepository {
    /// A store holding `entries`, newest first.
    pub fn with_entries(entries: Vec<Entry>) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(entries),
            next_id: AtomicU64::new(100),
            ..Default::default()
        })
    }

    /// Hold the next list or search call until the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn fail_next_query(&self, err: BabelError) {
        self.query_failures.lock().unwrap().push_back(err);
    }

    pub fn fail_next_write(&self, err: BabelError) {
        self.write_failures.lock().unwrap().push_back(err);
    }

    /// Change the store behind the client's back.
    pub fn insert_directly(&self, entry: Entry) {
        self.entries.lock().unwrap().insert(0, entry);
    }

    pub fn stored(&self) -> Vec<Entry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn query_calls(&self) -> usize {
        self.list_calls() + self.search_calls()
    }

    pub fn write_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
            + self.update_calls.load(Ordering::SeqCst)
            + self.delete_calls.load(Ordering::SeqCst)
    }

    /// Yield until `n` list/search calls have reached the store.
    pub async fn wait_for_queries(&self, n: usize) {
        while self.query_calls() < n {
            tokio::task::yield_now().await;
        }
    }

    async fn answer(&self, snapshot: Result<Vec<Entry>>) -> Result<Vec<Entry>> {
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        snapshot
    }

    fn take_query_failure(&self) -> Option<BabelError> {
        self.query_failures.lock().unwrap().pop_front()
    }

    fn take_write_failure(&self) -> Option<BabelError> {
        self.write_failures.lock().unwrap().pop_front()
    }
}

fn matches_term(entry: &Entry, term: &str) -> bool {
    let term = term.to_lowercase();
    [Some(&entry.title), Some(&entry.content), entry.source.as_ref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
        || entry.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

fn stored_from(id: EntryId, draft: &EntryDraft, date_added: NaiveDate) -> Entry {
    Entry {
        id,
        entry_type: draft.entry_type,
        title: draft.title.clone(),
        content: draft.content.clone(),
        source: draft.source.clone(),
        why_it_stuck: draft.why_it_stuck.clone(),
        extended_note: draft.extended_note.clone(),
        category: draft.category.clone(),
        tags: draft.tags.clone(),
        batch: draft.batch.clone(),
        date_added,
    }
}

#[async_trait]
impl EntryRepository for FakeRepository {
    async fn list_all(&self) -> Result<Vec<Entry>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = match self.take_query_failure() {
            Some(err) => Err(err),
            None => Ok(self.stored()),
        };
        self.answer(snapshot).await
    }

    async fn search(&self, term: &str, filter: TypeFilter) -> Result<Vec<Entry>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = match self.take_query_failure() {
            Some(err) => Err(err),
            None => Ok(self
                .stored()
                .into_iter()
                .filter(|e| filter.matches(e.entry_type) && matches_term(e, term))
                .collect()),
        };
        self.answer(snapshot).await
    }

    async fn create(&self, draft: &EntryDraft) -> Result<Entry> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        let id = EntryId::from(self.next_id.fetch_add(1, Ordering::SeqCst).to_string());
        let entry = stored_from(id, draft, draft.date_added.unwrap_or_else(today));
        self.insert_directly(entry.clone());
        Ok(entry)
    }

    async fn update(&self, id: &EntryId, draft: &EntryDraft) -> Result<Entry> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        let mut entries = self.entries.lock().unwrap();
        let slot = entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| BabelError::NotFound(id.clone()))?;
        *slot = stored_from(id.clone(), draft, draft.date_added.unwrap_or_else(today));
        Ok(slot.clone())
    }

    async fn delete(&self, id: &EntryId) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.take_write_failure() {
            return Err(err);
        }
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| &e.id != id);
        if entries.len() == before {
            return Err(BabelError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn health(&self) -> Result<StoreStatus> {
        Ok(StoreStatus {
            message: "fake store".to_string(),
            database: None,
        })
    }
}

/// A fresh session wired to `repo`.
pub fn library(repo: &Arc<FakeRepository>) -> Library {
    Library::new(Arc::clone(repo) as Arc<dyn EntryRepository>)
}
