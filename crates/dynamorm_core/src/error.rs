//! Error types for repository operations.

use dynamorm_codec::CodecError;
use dynamorm_storage::StoreError;
use thiserror::Error;

/// Result type for repository operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in repository operations.
///
/// Everything except [`CoreError::ConditionFailed`], [`CoreError::Aborted`],
/// [`CoreError::NotFound`] and [`CoreError::Store`] is detected locally,
/// before any store call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The entity's key has no attributes.
    #[error("key is required")]
    MissingKey,

    /// The key has an empty attribute name or a non-scalar value.
    #[error("invalid key: {message}")]
    InvalidKey {
        /// Description of the problem.
        message: String,
    },

    /// The modeler refused a record of a different kind.
    #[error("incompatible record: expected {expected}, found {found}")]
    IncompatibleRecord {
        /// Kind the modeler produces.
        expected: String,
        /// Kind found on the record.
        found: String,
    },

    /// Encoding an entity into an item failed.
    #[error("serialization failed: {0}")]
    Serialization(#[source] CodecError),

    /// Decoding an item into an entity failed.
    #[error("decode failed: {0}")]
    Decode(#[source] CodecError),

    /// A set-once value was changed after it had been stored.
    #[error("{field} cannot be changed (stored {stored}, attempted {attempted})")]
    ImmutableFieldChanged {
        /// Name of the field.
        field: String,
        /// Value as loaded.
        stored: String,
        /// Value the caller tried to save.
        attempted: String,
    },

    /// No item has the requested key.
    #[error("not found")]
    NotFound,

    /// A guard condition failed at the store; nothing was written.
    #[error("conditional check failed{}", member_suffix(.index))]
    ConditionFailed {
        /// Position in the write group of the member whose guard failed,
        /// when the store reports it.
        index: Option<usize>,
    },

    /// The store cancelled a transactional write for a reason other than a
    /// failed guard; nothing was written.
    #[error("write aborted: {reason}")]
    Aborted {
        /// Store-provided reason.
        reason: String,
    },

    /// The write group exceeds the store's transaction limit.
    #[error("write group has {size} members, limit is {limit}")]
    WriteGroupTooLarge {
        /// Members in the group.
        size: usize,
        /// Configured limit.
        limit: usize,
    },

    /// A repository was built with missing or inconsistent settings.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },

    /// Any other store failure, propagated unchanged.
    #[error("store error: {0}")]
    Store(#[source] StoreError),
}

fn member_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" on member {i}")).unwrap_or_default()
}

impl CoreError {
    /// Creates an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Creates an incompatible record error.
    pub fn incompatible(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::IncompatibleRecord {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Returns true if a guard condition rejected the write.
    #[must_use]
    pub fn is_condition_failed(&self) -> bool {
        matches!(self, Self::ConditionFailed { .. })
    }

    /// Returns true if a read found no item.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::ConditionFailed { .. } => Self::ConditionFailed { index: Some(0) },
            StoreError::TransactionCanceled { .. } => match err.first_condition_failure() {
                Some(index) => Self::ConditionFailed { index: Some(index) },
                None => Self::Aborted {
                    reason: err.to_string(),
                },
            },
            _ => Self::Store(err),
        }
    }
}
