//! Step-by-step repository construction.

use crate::config::RepositoryConfig;
use crate::error::{CoreError, CoreResult};
use crate::repository::{Modeler, Repository};
use dynamorm_codec::Item;
use dynamorm_storage::ItemStore;
use std::sync::Arc;

/// Builds a [`Repository`], checking that nothing required is missing.
///
/// ```rust
/// use dynamorm_core::{document_modeler, Document, RepositoryBuilder};
/// use dynamorm_storage::InMemoryStore;
/// use std::sync::Arc;
///
/// let repo = RepositoryBuilder::<Document, _>::new()
///     .with_store(Arc::new(InMemoryStore::new().with_table("people", &["PK"])))
///     .with_table_name("people")
///     .with_modeler(document_modeler(&["PK"]))
///     .build()
///     .unwrap();
/// assert_eq!(repo.table_name(), "people");
/// ```
pub struct RepositoryBuilder<T, S: ?Sized = dyn ItemStore> {
    store: Option<Arc<S>>,
    config: RepositoryConfig,
    modeler: Option<Modeler<T>>,
}

impl<T, S: ItemStore + ?Sized> RepositoryBuilder<T, S> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            config: RepositoryConfig::default(),
            modeler: None,
        }
    }

    /// Sets the store.
    #[must_use]
    pub fn with_store(mut self, store: Arc<S>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the table name.
    #[must_use]
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.config.table_name = table_name.into();
        self
    }

    /// Sets the modeler.
    #[must_use]
    pub fn with_modeler<F>(mut self, modeler: F) -> Self
    where
        F: Fn(&Item) -> CoreResult<T> + Send + Sync + 'static,
    {
        self.modeler = Some(Arc::new(modeler));
        self
    }

    /// Replaces the whole configuration. A table name set earlier is kept
    /// if `config` has none.
    #[must_use]
    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        let table_name = std::mem::take(&mut self.config.table_name);
        self.config = config;
        if self.config.table_name.is_empty() {
            self.config.table_name = table_name;
        }
        self
    }

    /// Builds the repository.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] if the store, the table
    /// name or the modeler is missing, or the configuration is invalid.
    pub fn build(self) -> CoreResult<Repository<T, S>> {
        let store = self
            .store
            .ok_or_else(|| CoreError::invalid_configuration("store is required"))?;
        let modeler = self
            .modeler
            .ok_or_else(|| CoreError::invalid_configuration("modeler is required"))?;
        Repository::with_config(store, self.config, modeler)
    }
}

impl<T, S: ItemStore + ?Sized> Default for RepositoryBuilder<T, S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{document_modeler, Document};
    use dynamorm_storage::InMemoryStore;

    fn store() -> Arc<InMemoryStore> {
        Arc::new(InMemoryStore::new().with_table("people", &["PK"]))
    }

    #[test]
    fn complete_builder() {
        let repo = RepositoryBuilder::<Document, InMemoryStore>::new()
            .with_store(store())
            .with_table_name("people")
            .with_modeler(document_modeler(&["PK"]))
            .with_config(RepositoryConfig::default().consistent_read(true))
            .build()
            .unwrap();
        assert_eq!(repo.table_name(), "people");
        assert!(repo.config().consistent_read);
    }

    #[test]
    fn missing_parts_are_reported() {
        let no_store = RepositoryBuilder::<Document, InMemoryStore>::new()
            .with_table_name("people")
            .with_modeler(document_modeler(&["PK"]))
            .build();
        assert!(matches!(no_store, Err(CoreError::InvalidConfiguration { .. })));

        let no_table = RepositoryBuilder::<Document, InMemoryStore>::new()
            .with_store(store())
            .with_modeler(document_modeler(&["PK"]))
            .build();
        assert!(matches!(no_table, Err(CoreError::InvalidConfiguration { .. })));

        let no_modeler = RepositoryBuilder::<Document, InMemoryStore>::new()
            .with_store(store())
            .with_table_name("people")
            .build();
        assert!(matches!(no_modeler, Err(CoreError::InvalidConfiguration { .. })));
    }

    #[test]
    fn dyn_store() {
        let store: Arc<dyn ItemStore> = store();
        let repo = RepositoryBuilder::<Document>::new()
            .with_store(store)
            .with_table_name("people")
            .with_modeler(document_modeler(&["PK"]))
            .build();
        assert!(repo.is_ok());
    }
}
