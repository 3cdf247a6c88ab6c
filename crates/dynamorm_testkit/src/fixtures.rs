//! Test fixtures and repository helpers.
//!
//! Provides ready-made repositories over an in-memory store wrapped in a
//! [`RecordingStore`], so tests can assert both on results and on the exact
//! requests that reached the store.

use crate::models::{person_modeler, user_modeler, PersonModel, UserModel};
use crate::recording::RecordingStore;
use dynamorm_codec::{AttributeValue, Item};
use dynamorm_core::Repository;
use dynamorm_storage::{Context, InMemoryStore, ItemStore, PutRequest, StoreResult};
use std::sync::Arc;

/// Table holding users and username reservations.
pub const USERS_TABLE: &str = "users";

/// Table holding people, keyed by `PK` and `SK`.
pub const PEOPLE_TABLE: &str = "people";

/// The store type behind every test repository.
pub type TestStore = RecordingStore<InMemoryStore>;

/// A repository together with the recording store it writes to.
pub struct TestRepository<T> {
    /// The repository under test.
    pub repo: Repository<T, TestStore>,
    /// The store, for seeding and inspection.
    pub store: Arc<TestStore>,
}

impl TestRepository<UserModel> {
    /// A user repository over an empty `users` table.
    pub fn users() -> Self {
        let store = Arc::new(RecordingStore::new(
            InMemoryStore::new().with_table(USERS_TABLE, &["PK"]),
        ));
        let repo = Repository::new(Arc::clone(&store), USERS_TABLE, user_modeler());
        Self { repo, store }
    }
}

impl TestRepository<PersonModel> {
    /// A person repository over an empty `people` table.
    pub fn people() -> Self {
        let store = Arc::new(RecordingStore::new(
            InMemoryStore::new().with_table(PEOPLE_TABLE, &["PK", "SK"]),
        ));
        let repo = Repository::new(Arc::clone(&store), PEOPLE_TABLE, person_modeler());
        Self { repo, store }
    }
}

impl<T> TestRepository<T> {
    /// Writes an item straight into the inner store, bypassing guards and
    /// the recorder.
    pub fn seed(&self, item: Item) {
        seed(self.store.inner(), self.repo.table_name(), item).expect("Failed to seed item");
    }

    /// Returns the stored item with the given string key attributes, if any.
    pub fn stored(&self, key: &[(&str, &str)]) -> Option<Item> {
        let wanted = item(key);
        self.store
            .inner()
            .items(self.repo.table_name())
            .into_iter()
            .find(|candidate| wanted.iter().all(|(k, v)| candidate.get(k) == Some(v)))
    }

    /// Returns the number of items in the table.
    pub fn item_count(&self) -> usize {
        self.store.inner().item_count(self.repo.table_name())
    }
}

impl<T> std::ops::Deref for TestRepository<T> {
    type Target = Repository<T, TestStore>;

    fn deref(&self) -> &Self::Target {
        &self.repo
    }
}

/// Writes an item unconditionally.
///
/// # Errors
///
/// Returns the store's error for an unknown table or a bad key.
pub fn seed<S: ItemStore + ?Sized>(store: &S, table: &str, item: Item) -> StoreResult<()> {
    store.put_item(&Context::background(), &PutRequest::new(table, item))
}

/// Builds an item of string attributes.
pub fn item(pairs: &[(&str, &str)]) -> Item {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), AttributeValue::from(*v)))
        .collect()
}

/// A context that never expires.
pub fn ctx() -> Context {
    Context::background()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamorm_core::Key;

    #[test]
    fn users_fixture_starts_empty() {
        let users = TestRepository::users();
        assert_eq!(users.item_count(), 0);
        assert_eq!(users.table_name(), USERS_TABLE);
    }

    #[test]
    fn seeded_items_are_visible() {
        let users = TestRepository::users();
        users.seed(item(&[("PK", "001"), ("Type", "User")]));

        assert!(users.stored(&[("PK", "001")]).is_some());
        assert!(users.stored(&[("PK", "002")]).is_none());

        let loaded = users.get(&ctx(), &Key::single("PK", "001")).unwrap();
        assert_eq!(loaded.id(), "001");
    }

    #[test]
    fn people_fixture_uses_composite_keys() {
        let people = TestRepository::people();
        assert_eq!(
            people.store.inner().key_schema(PEOPLE_TABLE),
            Some(vec!["PK".to_string(), "SK".to_string()])
        );
    }
}
