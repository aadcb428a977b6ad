//! Error types shared by the paging loader, the list wrapper and the
//! operation tracker.
//!
//! Fetch failures only ever travel through completions; nothing here is
//! returned synchronously from a dispatch call.

use std::fmt;

use thiserror::Error;

/// Errors delivered by a [`DataSource`](crate::paging::DataSource) load.
///
/// `Clone + PartialEq` so the error can be carried inside broadcast
/// events and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request was cancelled. Never shown to the user.
    #[error("request cancelled")]
    Cancelled,

    /// The fetch failed. Whether a retry makes sense is caller policy.
    #[error("fetch failed: {message}")]
    Failed { message: String },
}

impl FetchError {
    /// Build a [`FetchError::Failed`] from any displayable error.
    pub fn failed(err: impl fmt::Display) -> Self {
        FetchError::Failed {
            message: err.to_string(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    /// Short error type string for logs and events.
    pub fn error_type(&self) -> &'static str {
        match self {
            FetchError::Cancelled => "cancelled",
            FetchError::Failed { .. } => "fetch_failed",
        }
    }
}

/// Errors raised by the list wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// Neither the delegate nor the fallback provider produced a cell.
    ///
    /// This is a programmer misconfiguration, not a retryable failure.
    #[error("no cell provider for item {item} at index {index}")]
    MissingCellProvider { item: String, index: usize },

    #[error("index {index} out of bounds for snapshot of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },
}
