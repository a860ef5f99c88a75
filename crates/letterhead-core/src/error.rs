//! Error types for remote document structuring.
//!
//! The taxonomy mirrors how the pipeline reacts to a failure: transient
//! backend errors are retried with backoff, fatal backend errors propagate
//! immediately (or become a skip signal in optional contexts), and
//! `StructureNotFound` marks a precondition violation that must never be
//! retried.

use crate::document::SegmentKind;
use thiserror::Error;

/// Error types that can occur while structuring a remote document.
#[derive(Error, Debug)]
pub enum LetterheadError {
    /// Error response from the document backend.
    ///
    /// Status codes >= 500 are transient and eligible for retry; everything
    /// else is fatal. See [`LetterheadError::is_transient`].
    #[error("backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Transport-level failure before any backend response was received
    /// (connection refused, timeout, DNS). Always treated as transient.
    #[error("transport error: {0}")]
    Transport(String),

    /// The retry budget was spent on transient failures.
    #[error("retry budget exhausted after {attempts} attempts: {source}")]
    RetryLimitExceeded {
        attempts: u32,
        #[source]
        source: Box<LetterheadError>,
    },

    /// A structural predicate never became true within the polling budget.
    #[error("structure did not become visible after {attempts} polls")]
    PropagationTimeout { attempts: u32 },

    /// A segment was expected to contain a layout table and did not.
    ///
    /// The offset resolver is only invoked after the propagation waiter has
    /// confirmed the table, so this is a logic defect, not a retryable
    /// condition.
    #[error("no layout table found in {segment} segment")]
    StructureNotFound { segment: SegmentKind },

    /// A mutation failed construction-time validation.
    #[error("invalid mutation: {0}")]
    InvalidMutation(String),

    /// A retry or polling policy violates its invariants.
    #[error("invalid policy: {0}")]
    InvalidPolicy(String),

    /// The run was cancelled between remote calls.
    #[error("operation cancelled")]
    Cancelled,

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LetterheadError {
    /// Whether this failure is worth retrying.
    ///
    /// Backend responses with a 5xx status and transport-level failures are
    /// transient; every other error is treated as a caller mistake or a
    /// logic defect and fails fast.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Backend { status, .. } => *status >= 500,
            Self::Transport(_) => true,
            _ => false,
        }
    }

    /// Backend status code, if this error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            Self::RetryLimitExceeded { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Type alias for [`Result<T, LetterheadError>`].
pub type Result<T> = std::result::Result<T, LetterheadError>;
