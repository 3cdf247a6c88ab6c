//! Set-once dependent values.
//!
//! A dependent value (a unique username, say) is mirrored into its own
//! record so the store can enforce uniqueness. It may be set once; after
//! that it must not change. Whether a save creates the dependent record,
//! re-asserts an existing one, or must be refused is decided by comparing
//! the value as loaded with the value about to be saved.

use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use dynamorm_codec::AttributeValue;
use dynamorm_storage::Condition;
use std::fmt;

/// What a save means for a dependent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependentState {
    /// No value, before or now; nothing to write.
    Absent,
    /// Newly set; the dependent record must not exist yet.
    Created,
    /// Unchanged since load; the dependent record must exist and belong to
    /// the same owner.
    Existing,
}

impl DependentState {
    /// Builds the guard for the dependent record.
    ///
    /// `Created` asserts the dependent key does not exist (an absent record
    /// has no owner). `Existing` asserts it exists and that
    /// `owner_attribute` equals `owner`. `Absent` has no record and no guard.
    ///
    /// # Errors
    ///
    /// Fails like [`Key::validate`] for an unusable dependent key.
    pub fn guard(
        self,
        dependent_key: &Key,
        owner_attribute: &str,
        owner: impl Into<AttributeValue>,
    ) -> CoreResult<Option<Condition>> {
        match self {
            Self::Absent => Ok(None),
            Self::Created => dependent_key.guard_for_create().map(Some),
            Self::Existing => {
                let exists = dependent_key.guard_for_update()?;
                Ok(Some(exists.and(Condition::equal(owner_attribute, owner))))
            }
        }
    }
}

/// Classifies a dependent value from its loaded and to-be-saved snapshots.
///
/// | loaded | saving | result |
/// |---|---|---|
/// | none | none | `Absent` |
/// | none | some | `Created` |
/// | `v` | `v` | `Existing` |
/// | `v` | other or none | `ImmutableFieldChanged` |
///
/// Clearing a stored value counts as a change. Dropping the value from the
/// owner would leave its reservation behind with nothing pointing at it, so
/// the save is refused and the attempted value is reported as `nothing`.
///
/// # Errors
///
/// Returns [`CoreError::ImmutableFieldChanged`] when a stored value would
/// change or be cleared.
pub fn classify_dependent<V>(
    field: &str,
    loaded: Option<&V>,
    saving: Option<&V>,
) -> CoreResult<DependentState>
where
    V: PartialEq + fmt::Debug + ?Sized,
{
    match (loaded, saving) {
        (None, None) => Ok(DependentState::Absent),
        (None, Some(_)) => Ok(DependentState::Created),
        (Some(stored), Some(attempted)) if stored == attempted => Ok(DependentState::Existing),
        (Some(stored), attempted) => Err(CoreError::ImmutableFieldChanged {
            field: field.to_string(),
            stored: format!("{stored:?}"),
            attempted: attempted.map_or_else(|| "nothing".to_string(), |v| format!("{v:?}")),
        }),
    }
}
