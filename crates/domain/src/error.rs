//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ShellError`]
//! via `#[from]`. Errors that must reach several waiters at once
//! ([`LoadError`], [`FetchError`]) are `Clone`.

use std::error::Error as StdError;

/// Top-level error for pageshell operations.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("page load failed")]
    Load(#[from] LoadError),

    #[error("icon chunk fetch failed")]
    Fetch(#[from] FetchError),

    #[error("storage error")]
    Storage(#[source] Box<dyn StdError + Send + Sync>),
}

/// Invariant violations in configuration or input data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("page `{page}` has an empty element tag")]
    EmptyTag { page: String },

    #[error("redirect alias `{page}` is part of a cycle")]
    RedirectCycle { page: String },

    #[error("redirect alias `{from}` points to unknown page `{to}`")]
    UnknownRedirect { from: String, to: String },

    #[error("invalid icon name `{0}`")]
    InvalidIconName(String),

    #[error("partition table is empty")]
    EmptyPartitionTable,

    #[error("partition `{file}` has no start but is not the first partition")]
    MissingPartitionStart { file: String },

    #[error("partition starting at `{start}` is out of order")]
    UnsortedPartition { start: String },
}

/// A lookup for a named resource came back empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A page loader (lazy module import, initial data fetch) failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LoadError {
    pub message: String,
}

impl LoadError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A glyph catalog chunk could not be fetched or decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to fetch icon chunk `{file}`: {reason}")]
pub struct FetchError {
    pub file: String,
    pub reason: String,
}

impl FetchError {
    #[must_use]
    pub fn new(file: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            file: file.into(),
            reason: reason.to_string(),
        }
    }
}
