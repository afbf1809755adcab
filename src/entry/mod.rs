pub mod parser;
pub mod stats;
pub mod types;

pub use types::{Entry, EntryDraft, EntryId, EntryType, TypeFilter, ViewIntent};
