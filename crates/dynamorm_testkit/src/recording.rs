//! A store wrapper that records every call and can inject failures.

use dynamorm_codec::Item;
use dynamorm_storage::{Context, GetRequest, ItemStore, PutRequest, StoreError, StoreResult};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// One call made against a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `get_item`
    Get(GetRequest),
    /// `put_item`
    Put(PutRequest),
    /// `transact_write`
    Transact(Vec<PutRequest>),
}

impl StoreCall {
    /// Returns true for `put_item` and `transact_write`.
    pub fn is_write(&self) -> bool {
        !matches!(self, StoreCall::Get(_))
    }

    /// Returns the put requests carried by a write.
    pub fn puts(&self) -> &[PutRequest] {
        match self {
            StoreCall::Get(_) => &[],
            StoreCall::Put(put) => std::slice::from_ref(put),
            StoreCall::Transact(puts) => puts,
        }
    }
}

/// Wraps a store, recording calls in order.
///
/// Failures queued with [`RecordingStore::fail_next`] are returned by the
/// following calls, in order, without reaching the inner store. Calls are
/// recorded either way.
#[derive(Debug, Default)]
pub struct RecordingStore<S> {
    inner: S,
    calls: Mutex<Vec<StoreCall>>,
    failures: Mutex<VecDeque<StoreError>>,
}

impl<S: ItemStore> RecordingStore<S> {
    /// Wraps `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Returns the wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns every call made so far.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().clone()
    }

    /// Returns only the write calls.
    pub fn writes(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.is_write())
            .cloned()
            .collect()
    }

    /// Returns the number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Forgets recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    /// Makes the next call fail with `error`.
    pub fn fail_next(&self, error: StoreError) {
        self.failures.lock().push_back(error);
    }

    fn record(&self, call: StoreCall) -> StoreResult<()> {
        self.calls.lock().push(call);
        match self.failures.lock().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl<S: ItemStore> ItemStore for RecordingStore<S> {
    fn get_item(&self, ctx: &Context, request: &GetRequest) -> StoreResult<Item> {
        self.record(StoreCall::Get(request.clone()))?;
        self.inner.get_item(ctx, request)
    }

    fn put_item(&self, ctx: &Context, request: &PutRequest) -> StoreResult<()> {
        self.record(StoreCall::Put(request.clone()))?;
        self.inner.put_item(ctx, request)
    }

    fn transact_write(&self, ctx: &Context, requests: &[PutRequest]) -> StoreResult<()> {
        self.record(StoreCall::Transact(requests.to_vec()))?;
        self.inner.transact_write(ctx, requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamorm_codec::AttributeValue;
    use dynamorm_storage::InMemoryStore;

    fn put(pk: &str) -> PutRequest {
        let mut item = Item::new();
        item.insert("PK".into(), AttributeValue::from(pk));
        PutRequest::new("t", item)
    }

    #[test]
    fn records_in_order() {
        let store = RecordingStore::new(InMemoryStore::new().with_table("t", &["PK"]));
        let ctx = Context::background();

        store.put_item(&ctx, &put("a")).unwrap();
        store.transact_write(&ctx, &[put("b"), put("c")]).unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], StoreCall::Put(put("a")));
        assert_eq!(calls[1].puts().len(), 2);
        assert_eq!(store.inner().item_count("t"), 3);
    }

    #[test]
    fn injected_failure_skips_inner_store() {
        let store = RecordingStore::new(InMemoryStore::new().with_table("t", &["PK"]));
        let ctx = Context::background();
        store.fail_next(StoreError::transport_retryable("throttled"));

        let result = store.put_item(&ctx, &put("a"));
        assert!(matches!(result, Err(StoreError::Transport { retryable: true, .. })));
        assert_eq!(store.inner().item_count("t"), 0);
        assert_eq!(store.writes().len(), 1);

        store.put_item(&ctx, &put("a")).unwrap();
        assert_eq!(store.inner().item_count("t"), 1);

        store.clear();
        assert_eq!(store.call_count(), 0);
    }
}
