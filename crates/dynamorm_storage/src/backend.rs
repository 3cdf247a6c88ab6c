//! Item store trait definition.

use crate::context::Context;
use crate::error::StoreResult;
use crate::request::{GetRequest, PutRequest};
use dynamorm_codec::Item;
use std::sync::Arc;

/// A remote key-value item store.
///
/// This is the seam between repositories and whatever actually holds the
/// data: a network client for a hosted service, or [`super::InMemoryStore`]
/// for tests. Stores interpret keys and evaluate conditions; they know
/// nothing about entities.
///
/// # Invariants
///
/// - `get_item` returns an empty item when no item has the key
/// - `put_item` applies the write only if its condition holds, atomically
///   with the check
/// - `transact_write` applies every member or none; a failed condition on
///   any member cancels the whole group
/// - every call honours the [`Context`] it is given, reporting
///   cancellation or deadline expiry instead of performing the call
/// - stores must be `Send + Sync`; repositories share them across threads
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For testing and local tooling
pub trait ItemStore: Send + Sync {
    /// Reads the item with the request's key.
    ///
    /// # Errors
    ///
    /// Returns an error if the table does not exist, the key does not match
    /// the table's key schema, the context is done, or the transport fails.
    fn get_item(&self, ctx: &Context, request: &GetRequest) -> StoreResult<Item>;

    /// Writes one item, subject to its condition.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::ConditionFailed`] if the condition does not
    /// hold, or any of the errors `get_item` can return.
    fn put_item(&self, ctx: &Context, request: &PutRequest) -> StoreResult<()>;

    /// Writes every request atomically.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::TransactionCanceled`] with one reason per
    /// member if any condition fails, or
    /// [`crate::StoreError::InvalidRequest`] if the group is empty, too large,
    /// or writes the same item twice.
    fn transact_write(&self, ctx: &Context, requests: &[PutRequest]) -> StoreResult<()>;
}

impl<S: ItemStore + ?Sized> ItemStore for Arc<S> {
    fn get_item(&self, ctx: &Context, request: &GetRequest) -> StoreResult<Item> {
        (**self).get_item(ctx, request)
    }

    fn put_item(&self, ctx: &Context, request: &PutRequest) -> StoreResult<()> {
        (**self).put_item(ctx, request)
    }

    fn transact_write(&self, ctx: &Context, requests: &[PutRequest]) -> StoreResult<()> {
        (**self).transact_write(ctx, requests)
    }
}

impl<S: ItemStore + ?Sized> ItemStore for &S {
    fn get_item(&self, ctx: &Context, request: &GetRequest) -> StoreResult<Item> {
        (**self).get_item(ctx, request)
    }

    fn put_item(&self, ctx: &Context, request: &PutRequest) -> StoreResult<()> {
        (**self).put_item(ctx, request)
    }

    fn transact_write(&self, ctx: &Context, requests: &[PutRequest]) -> StoreResult<()> {
        (**self).transact_write(ctx, requests)
    }
}
