//! Repository configuration.

use crate::error::{CoreError, CoreResult};
use dynamorm_storage::MAX_TRANSACTION_ITEMS;

/// Configuration for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Table every request is addressed to.
    pub table_name: String,

    /// Whether reads are strongly consistent.
    pub consistent_read: bool,

    /// Largest write group accepted before any store call.
    pub max_transaction_items: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            consistent_read: false,
            max_transaction_items: MAX_TRANSACTION_ITEMS,
        }
    }
}

impl RepositoryConfig {
    /// Creates a configuration for a table with default settings.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// Sets the table name.
    #[must_use]
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Sets whether reads are strongly consistent.
    #[must_use]
    pub const fn consistent_read(mut self, value: bool) -> Self {
        self.consistent_read = value;
        self
    }

    /// Sets the largest accepted write group.
    #[must_use]
    pub const fn max_transaction_items(mut self, limit: usize) -> Self {
        self.max_transaction_items = limit;
        self
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfiguration`] for an empty table name or
    /// a zero transaction limit.
    pub fn validate(&self) -> CoreResult<()> {
        if self.table_name.is_empty() {
            return Err(CoreError::invalid_configuration("table name is required"));
        }
        if self.max_transaction_items == 0 {
            return Err(CoreError::invalid_configuration(
                "max_transaction_items must be at least 1",
            ));
        }
        Ok(())
    }
}
