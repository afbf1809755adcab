//! Error taxonomy shared by the repository and the sync layer.

use thiserror::Error;

use crate::entry::types::EntryId;

/// Failures surfaced by repository calls and mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BabelError {
    /// Required field missing locally, or the store rejected the payload.
    #[error("invalid entry: {0}")]
    Validation(String),

    /// The request could not be completed (connect failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with a non-success status or an unreadable body.
    #[error("store returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The targeted entry no longer exists.
    #[error("entry not found: {0}")]
    NotFound(EntryId),
}

impl BabelError {
    /// `true` for failures a plain retry may fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Server { status, .. } => *status >= 500,
            Self::Validation(_) | Self::NotFound(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BabelError>;
