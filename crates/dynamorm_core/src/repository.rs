//! The repository facade.

use crate::builder::RepositoryBuilder;
use crate::config::RepositoryConfig;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::write::{execute_write, plan_write, WriteGroup, WriteIntent};
use dynamorm_codec::Item;
use dynamorm_storage::{Context, GetRequest, ItemStore};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Decodes a raw item into one concrete entity type.
///
/// A modeler should refuse records of a different kind with
/// [`CoreError::IncompatibleRecord`].
pub type Modeler<T> = Arc<dyn Fn(&Item) -> CoreResult<T> + Send + Sync>;

/// Typed access to one table for one entity type.
///
/// A repository holds a store handle, its configuration and a modeler. It
/// keeps no other state and caches nothing, so a single instance can serve
/// concurrent callers; conflicting writes to the same key are resolved by
/// the store through guard conditions.
///
/// # Example
///
/// ```rust
/// use dynamorm_core::{Document, Key, Repository, document_modeler};
/// use dynamorm_storage::{Context, InMemoryStore};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let store = Arc::new(InMemoryStore::new().with_table("people", &["PK"]));
/// let repo = Repository::new(store, "people", document_modeler(&["PK"]));
/// let ctx = Context::background();
///
/// let alice = Document::from_json(&["PK"], json!({"PK": "001", "Name": "Alice"})).unwrap();
/// repo.create(&ctx, &alice).unwrap();
/// assert!(repo.create(&ctx, &alice).unwrap_err().is_condition_failed());
///
/// let loaded = repo.get(&ctx, &Key::single("PK", "001")).unwrap();
/// assert_eq!(loaded.get("Name"), Some(&json!("Alice")));
/// ```
pub struct Repository<T, S: ?Sized = dyn ItemStore> {
    store: Arc<S>,
    config: RepositoryConfig,
    modeler: Modeler<T>,
}

impl<T, S: ItemStore + ?Sized> Repository<T, S> {
    /// Creates a repository with default settings for `table_name`.
    ///
    /// The name is trusted. [`Repository::with_config`] and the builder
    /// validate their input and report an unusable configuration as an
    /// error instead.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `table_name` is empty.
    pub fn new<F>(store: Arc<S>, table_name: impl Into<String>, modeler: F) -> Self
    where
        F: Fn(&Item) -> CoreResult<T> + Send + Sync + 'static,
    {
        let config = RepositoryConfig::new(table_name);
        debug_assert!(
            config.validate().is_ok(),
            "repository table name must not be empty"
        );
        Self {
            store,
            config,
            modeler: Arc::new(modeler),
        }
    }

    /// Creates a repository from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] if the configuration is
    /// unusable.
    pub fn with_config(
        store: Arc<S>,
        config: RepositoryConfig,
        modeler: Modeler<T>,
    ) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            modeler,
        })
    }

    /// Starts a builder.
    #[must_use]
    pub fn builder() -> RepositoryBuilder<T, S> {
        RepositoryBuilder::new()
    }

    /// Returns the table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Returns the store handle.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Loads the entity with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingKey`] / [`CoreError::InvalidKey`] before
    /// any store call for an unusable key, [`CoreError::NotFound`] if no item
    /// has the key, and whatever the modeler returns for a record it cannot
    /// decode.
    pub fn get(&self, ctx: &Context, key: &Key) -> CoreResult<T> {
        key.validate()?;

        let request = GetRequest::new(self.table_name(), key.attributes().clone())
            .consistent(self.config.consistent_read);
        let item = self.store.get_item(ctx, &request)?;
        if item.is_empty() {
            debug!(table = self.table_name(), %key, "item not found");
            return Err(CoreError::NotFound);
        }

        (self.modeler)(&item)
    }
}

impl<T: Entity, S: ItemStore + ?Sized> Repository<T, S> {
    /// Saves a new entity and its related entities.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConditionFailed`] if the entity already exists
    /// (or a related guard fails); nothing is written in that case. Local
    /// failures are reported as by [`Repository::plan`].
    pub fn create(&self, ctx: &Context, entity: &T) -> CoreResult<()> {
        self.save(ctx, entity, WriteIntent::Create)
    }

    /// Replaces an existing entity and saves its related entities.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ConditionFailed`] if the entity does not exist
    /// (or a related guard fails); nothing is written in that case. Local
    /// failures are reported as by [`Repository::plan`].
    pub fn update(&self, ctx: &Context, entity: &T) -> CoreResult<()> {
        self.save(ctx, entity, WriteIntent::Update)
    }

    /// Plans the writes a save would perform, without performing them.
    ///
    /// # Errors
    ///
    /// See [`plan_write`].
    pub fn plan(&self, entity: &T, intent: WriteIntent) -> CoreResult<WriteGroup> {
        plan_write(
            entity,
            intent,
            self.table_name(),
            self.config.max_transaction_items,
        )
    }

    fn save(&self, ctx: &Context, entity: &T, intent: WriteIntent) -> CoreResult<()> {
        let group = self.plan(entity, intent)?;
        execute_write(&*self.store, ctx, &group)
    }
}

impl<T, S: ?Sized> Clone for Repository<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config.clone(),
            modeler: Arc::clone(&self.modeler),
        }
    }
}

impl<T, S: ?Sized> fmt::Debug for Repository<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{document_modeler, Document};
    use dynamorm_storage::{InMemoryStore, StoreError};
    use serde_json::json;

    fn repo() -> Repository<Document, InMemoryStore> {
        let store = Arc::new(InMemoryStore::new().with_table("people", &["PK"]));
        Repository::new(store, "people", document_modeler(&["PK"]))
    }

    fn doc(pk: &str, name: &str) -> Document {
        Document::from_json(&["PK"], json!({ "PK": pk, "Name": name })).unwrap()
    }

    #[test]
    fn create_then_get() {
        let repo = repo();
        let ctx = Context::background();
        repo.create(&ctx, &doc("001", "Alice")).unwrap();

        let loaded = repo.get(&ctx, &Key::single("PK", "001")).unwrap();
        assert_eq!(loaded, doc("001", "Alice"));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "table name must not be empty")]
    fn unnamed_table_is_refused_in_debug_builds() {
        let store = Arc::new(InMemoryStore::new());
        let _ = Repository::new(store, "", document_modeler(&["PK"]));
    }

    #[test]
    fn get_missing_is_not_found() {
        let repo = repo();
        let result = repo.get(&Context::background(), &Key::single("PK", "nope"));
        assert_eq!(result.unwrap_err(), CoreError::NotFound);
    }

    #[test]
    fn get_with_empty_key_fails_locally() {
        let repo = repo();
        let (ctx, handle) = Context::background().with_cancellation();
        handle.cancel();
        // A cancelled context would fail any store call; the key check comes first.
        assert_eq!(repo.get(&ctx, &Key::new()).unwrap_err(), CoreError::MissingKey);
    }

    #[test]
    fn update_requires_existing() {
        let repo = repo();
        let ctx = Context::background();
        assert!(repo
            .update(&ctx, &doc("001", "Alice"))
            .unwrap_err()
            .is_condition_failed());
        assert_eq!(repo.store().item_count("people"), 0);

        repo.create(&ctx, &doc("001", "Alice")).unwrap();
        repo.update(&ctx, &doc("001", "Alicia")).unwrap();
        let loaded = repo.get(&ctx, &Key::single("PK", "001")).unwrap();
        assert_eq!(loaded.get("Name"), Some(&json!("Alicia")));
    }

    #[test]
    fn cancellation_reaches_the_store() {
        let repo = repo();
        let (ctx, handle) = Context::background().with_cancellation();
        handle.cancel();
        assert_eq!(
            repo.create(&ctx, &doc("001", "Alice")).unwrap_err(),
            CoreError::Store(StoreError::Cancelled)
        );
    }

    #[test]
    fn with_config_validates() {
        let store = Arc::new(InMemoryStore::new());
        let modeler: Modeler<Document> = Arc::new(document_modeler(&["PK"]));
        let result = Repository::with_config(store, RepositoryConfig::default(), modeler);
        assert!(matches!(
            result,
            Err(CoreError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn clones_share_the_store() {
        let repo = repo();
        let other = repo.clone();
        repo.create(&Context::background(), &doc("001", "Alice")).unwrap();
        assert_eq!(other.store().item_count("people"), 1);
        assert!(format!("{other:?}").contains("people"));
    }
}
