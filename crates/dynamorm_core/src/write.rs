//! Write planning and execution.
//!
//! A save is split in two steps. Planning is pure: it validates the root
//! key, assembles the root put with its guard, discovers related entities
//! and assembles their puts. Execution sends the resulting group to the
//! store, as a single conditional put when the group has one member and as
//! one transaction otherwise.
//!
//! Every local failure (bad key, encoding error, refused relation, oversized
//! group) surfaces from planning, so nothing is sent to the store.

use crate::entity::{DynEntity, Entity};
use crate::error::{CoreError, CoreResult};
use crate::put::assemble;
use dynamorm_storage::{Context, ItemStore, PutRequest};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace, warn};

/// Whether a save creates a new record or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteIntent {
    /// The root record must not exist yet.
    Create,
    /// The root record must already exist.
    Update,
}

impl WriteIntent {
    /// Returns the intent name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WriteIntent::Create => "create",
            WriteIntent::Update => "update",
        }
    }
}

impl fmt::Display for WriteIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordered puts of one save: the root first, then related entities in
/// discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteGroup {
    intent: WriteIntent,
    requests: Vec<PutRequest>,
}

impl WriteGroup {
    /// The intent the group was planned for.
    #[must_use]
    pub fn intent(&self) -> WriteIntent {
        self.intent
    }

    /// All requests, root first.
    #[must_use]
    pub fn requests(&self) -> &[PutRequest] {
        &self.requests
    }

    /// The root entity's request.
    #[must_use]
    pub fn root(&self) -> &PutRequest {
        &self.requests[0]
    }

    /// The related entities' requests.
    #[must_use]
    pub fn related(&self) -> &[PutRequest] {
        &self.requests[1..]
    }

    /// Number of requests (at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Always false; a group contains at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Whether execution uses a transaction rather than a single put.
    #[must_use]
    pub fn is_transactional(&self) -> bool {
        self.requests.len() > 1
    }

    /// Consumes the group, returning its requests.
    #[must_use]
    pub fn into_requests(self) -> Vec<PutRequest> {
        self.requests
    }
}

/// Plans the writes for saving `entity` into `table_name`.
///
/// The root gets the entity's own guard if it has one, otherwise the key
/// derived guard for `intent`. Related entities keep whatever guard they
/// carry; none is synthesized for them.
///
/// # Errors
///
/// Returns [`CoreError::MissingKey`] / [`CoreError::InvalidKey`] for an
/// unusable root or related key, [`CoreError::Serialization`] for a payload
/// that cannot be encoded, any error from relation discovery verbatim, and
/// [`CoreError::WriteGroupTooLarge`] if the group exceeds `max_items`.
pub fn plan_write<E: Entity>(
    entity: &E,
    intent: WriteIntent,
    table_name: &str,
    max_items: usize,
) -> CoreResult<WriteGroup> {
    let key = entity.key();
    key.validate()?;

    let mut root = assemble(table_name, entity)?;
    if root.condition.is_none() {
        let guard = match intent {
            WriteIntent::Create => key.guard_for_create()?,
            WriteIntent::Update => key.guard_for_update()?,
        };
        root.condition = Some(guard.build());
    }

    let mut requests = vec![root];
    if let Some(relations) = entity.relations() {
        for related in relations.related()? {
            let put = assemble(table_name, related.as_ref())?;
            trace!(
                key = %related.entity_key(),
                guard = put.condition_expression().unwrap_or("none"),
                "related entity"
            );
            requests.push(put);
        }
    }

    if requests.len() > max_items {
        return Err(CoreError::WriteGroupTooLarge {
            size: requests.len(),
            limit: max_items,
        });
    }

    debug!(
        table = table_name,
        %intent,
        %key,
        members = requests.len(),
        "planned write group"
    );
    Ok(WriteGroup { intent, requests })
}

/// Sends a planned group to the store.
///
/// The context is passed through unchanged.
///
/// # Errors
///
/// Returns [`CoreError::ConditionFailed`] if any guard fails (nothing is
/// written), [`CoreError::Aborted`] if the store cancels the transaction for
/// another reason, and [`CoreError::Store`] for everything else.
pub fn execute_write<S: ItemStore + ?Sized>(
    store: &S,
    ctx: &Context,
    group: &WriteGroup,
) -> CoreResult<()> {
    let result = match group.requests() {
        [single] => store.put_item(ctx, single),
        requests => store.transact_write(ctx, requests),
    };

    match result {
        Ok(()) => {
            debug!(
                intent = %group.intent(),
                members = group.len(),
                transactional = group.is_transactional(),
                "write group applied"
            );
            Ok(())
        }
        Err(err) => {
            let err = CoreError::from(err);
            warn!(
                intent = %group.intent(),
                members = group.len(),
                error = %err,
                "write group rejected"
            );
            Err(err)
        }
    }
}
