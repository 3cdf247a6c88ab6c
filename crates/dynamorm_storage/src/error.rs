//! Error types for store operations.

use std::fmt;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Why a single member of a transactional write was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancellationReason {
    /// The member was not the cause of the cancellation.
    None,
    /// The member's condition expression evaluated to false.
    ConditionalCheckFailed,
    /// The member conflicted with another in-flight transaction.
    TransactionConflict,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            CancellationReason::None => "None",
            CancellationReason::ConditionalCheckFailed => "ConditionalCheckFailed",
            CancellationReason::TransactionConflict => "TransactionConflict",
        };
        f.write_str(code)
    }
}

/// Errors reported by an item store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A single conditional write was rejected by its condition.
    #[error("conditional check failed on table {table}")]
    ConditionFailed {
        /// Table the write targeted.
        table: String,
    },

    /// A transactional write was cancelled; nothing was applied.
    #[error("transaction canceled, reasons [{}]", join_reasons(.reasons))]
    TransactionCanceled {
        /// One reason per member, in request order.
        reasons: Vec<CancellationReason>,
    },

    /// The addressed table does not exist.
    #[error("table not found: {table}")]
    TableNotFound {
        /// Name of the table.
        table: String,
    },

    /// The request was malformed (bad key, oversized transaction, ...).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// The caller cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline passed before the operation completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Network or service failure.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },
}

fn join_reasons(reasons: &[CancellationReason]) -> String {
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl StoreError {
    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a table not found error.
    pub fn table_not_found(table: impl Into<String>) -> Self {
        Self::TableNotFound {
            table: table.into(),
        }
    }

    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns the index of the first transaction member whose condition
    /// failed, if this is a transaction cancellation caused by a condition.
    #[must_use]
    pub fn first_condition_failure(&self) -> Option<usize> {
        match self {
            StoreError::TransactionCanceled { reasons } => reasons
                .iter()
                .position(|r| *r == CancellationReason::ConditionalCheckFailed),
            _ => None,
        }
    }

    /// Returns true if this error can be retried by the caller.
    ///
    /// Nothing in this workspace retries; the flag is informational.
    pub fn is_retryable(&self) -> bool {
        match self {
            StoreError::Transport { retryable, .. } => *retryable,
            StoreError::TransactionCanceled { reasons } => reasons
                .iter()
                .any(|r| *r == CancellationReason::TransactionConflict),
            _ => false,
        }
    }
}
