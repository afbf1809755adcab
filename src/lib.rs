//! Library of Babel client: capture words, phrases, authors, concepts, and excerpts,
//! then search, filter, edit, and prune them.
//!
//! Entries live in a remote store with a small CRUD/search HTTP surface. This crate is
//! the client side: it decides what to fetch, keeps a reconciled copy of what the user
//! is looking at, and makes sure overlapping requests can never show stale results.
//!
//! | Type | Holds |
//! |------|-------|
//! | **word** | A single term worth keeping |
//! | **phrase** | A saying or expression |
//! | **author** | A writer or thinker |
//! | **concept** | An idea or framework |
//! | **excerpt** | A quoted passage |
//!
//! # Architecture
//!
//! - **Repository**: [`repository::EntryRepository`], one round trip per call, no state
//! - **Queries**: [`sync::QueryCoordinator`] tags every view-intent change with a sequence
//!   number and applies only the latest result
//! - **Mutations**: [`sync::MutationOrchestrator`] patches the displayed collection only
//!   after the store confirms
//! - **State**: [`sync::Session`] owns the displayed collection and is shared by both
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`entry`]: Entry records, drafts, view intents, statistics, and the smart text parser
//! - [`error`]: The [`BabelError`] taxonomy
//! - [`repository`]: Transport adapter for the remote store
//! - [`sync`]: Query coordination, mutation orchestration, and the collection store

pub mod config;
pub mod entry;
pub mod error;
pub mod repository;
pub mod sync;

pub use error::{BabelError, Result};
