//! Transport adapter for the remote entry store.
//!
//! Provides the [`EntryRepository`] trait and an HTTP implementation talking to the
//! store's CRUD/search endpoints. The repository is created via
//! [`create_repository`] from configuration. Implementations hold no client-side
//! state and never retry: every method is exactly one round trip.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryDraft, EntryId, TypeFilter};
use crate::error::Result;

/// Self-description returned by the store's root endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub message: String,
    /// Storage backend name reported by the store (e.g. `"PostgreSQL"`).
    #[serde(default)]
    pub database: Option<String>,
}

/// The five entry operations plus a health probe.
///
/// Callers in the sync layer hold an `Arc<dyn EntryRepository>` so tests can swap in a
/// scripted fake.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Every entry, newest first.
    async fn list_all(&self) -> Result<Vec<Entry>>;

    /// Entries matching `term` (case-insensitive, store-defined fields) and `filter`.
    async fn search(&self, term: &str, filter: TypeFilter) -> Result<Vec<Entry>>;

    /// Persist a new entry; the store assigns its id.
    async fn create(&self, draft: &EntryDraft) -> Result<Entry>;

    /// Overwrite the entry with `id`.
    async fn update(&self, id: &EntryId, draft: &EntryDraft) -> Result<Entry>;

    async fn delete(&self, id: &EntryId) -> Result<()>;

    /// Probe the store's root endpoint.
    async fn health(&self) -> Result<StoreStatus>;
}

/// Create the HTTP repository described by `[remote]` config.
pub fn create_repository(
    config: &crate::config::RemoteConfig,
) -> anyhow::Result<Box<dyn EntryRepository>> {
    let repository = http::HttpRepository::new(config)?;
    Ok(Box::new(repository))
}
