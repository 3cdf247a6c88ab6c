//! In-memory item store for testing and local tooling.

use crate::backend::ItemStore;
use crate::context::Context;
use crate::error::{CancellationReason, StoreError, StoreResult};
use crate::request::{GetRequest, PutRequest};
use dynamorm_codec::{normalize_number, AttributeValue, Item};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Maximum number of members in one transactional write.
pub const MAX_TRANSACTION_ITEMS: usize = 100;

#[derive(Debug, Clone, Default)]
struct Table {
    key_schema: Vec<String>,
    items: BTreeMap<String, Item>,
}

impl Table {
    fn new(key_schema: Vec<String>) -> Self {
        Self {
            key_schema,
            items: BTreeMap::new(),
        }
    }

    /// Derives the storage slot of an item from its key attributes.
    ///
    /// Extra attributes are ignored; missing or non-scalar key attributes
    /// are rejected. Number keys are addressed by value, so `7` and `7.0`
    /// name the same item.
    fn slot(&self, table: &str, item: &Item) -> StoreResult<String> {
        if self.key_schema.is_empty() {
            return Err(StoreError::invalid_request(format!(
                "table {table} has no key schema"
            )));
        }

        let mut parts: Vec<AttributeValue> = Vec::with_capacity(self.key_schema.len());
        for name in &self.key_schema {
            match item.get(name) {
                Some(AttributeValue::N(text)) => {
                    let number = normalize_number(text).map_err(|e| {
                        StoreError::invalid_request(format!("key attribute {name}: {e}"))
                    })?;
                    parts.push(AttributeValue::N(number));
                }
                Some(value) if value.is_key_scalar() => parts.push(value.clone()),
                Some(value) => {
                    return Err(StoreError::invalid_request(format!(
                        "key attribute {name} has type {}, expected S, N or B",
                        value.type_descriptor()
                    )))
                }
                None => {
                    return Err(StoreError::invalid_request(format!(
                        "missing key attribute {name}"
                    )))
                }
            }
        }

        serde_json::to_string(&parts).map_err(|e| StoreError::invalid_request(e.to_string()))
    }

    /// Like [`Table::slot`], but the key must name exactly the schema's
    /// attributes.
    fn exact_slot(&self, table: &str, key: &Item) -> StoreResult<String> {
        if key.len() != self.key_schema.len() {
            return Err(StoreError::invalid_request(format!(
                "key has {} attributes, table {table} expects {}",
                key.len(),
                self.key_schema.len()
            )));
        }
        self.slot(table, key)
    }
}

/// Serializable image of an [`InMemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Tables by name.
    pub tables: BTreeMap<String, TableSnapshot>,
}

/// Serializable image of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSnapshot {
    /// Primary-key attribute names, partition key first.
    pub key_schema: Vec<String>,
    /// Every stored item, ordered by key.
    #[serde(default)]
    pub items: Vec<Item>,
}

/// An in-memory item store.
///
/// Tables are declared up front with their key schema. Conditions are
/// evaluated against the stored item under a write lock, so a conditional
/// put or a transactional write is atomic with respect to every other call
/// on the same store.
///
/// Transactional writes follow the hosted service's rules: at most
/// [`MAX_TRANSACTION_ITEMS`] members, no two members targeting the same
/// item, and all-or-nothing application.
///
/// # Thread Safety
///
/// The store is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use dynamorm_codec::{AttributeValue, Item};
/// use dynamorm_storage::{Context, GetRequest, InMemoryStore, ItemStore, PutRequest};
///
/// let store = InMemoryStore::new().with_table("people", &["PK"]);
/// let ctx = Context::background();
///
/// let mut item = Item::new();
/// item.insert("PK".into(), AttributeValue::from("001"));
/// item.insert("Name".into(), AttributeValue::from("Alice"));
/// store.put_item(&ctx, &PutRequest::new("people", item.clone())).unwrap();
///
/// let mut key = Item::new();
/// key.insert("PK".into(), AttributeValue::from("001"));
/// let loaded = store.get_item(&ctx, &GetRequest::new("people", key)).unwrap();
/// assert_eq!(loaded, item);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<BTreeMap<String, Table>>,
}

impl InMemoryStore {
    /// Creates a store with no tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) an empty table with the given key schema.
    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, key_schema: &[&str]) -> Self {
        let schema = key_schema.iter().map(|s| (*s).to_string()).collect();
        self.tables.get_mut().insert(name.into(), Table::new(schema));
        self
    }

    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRequest`] if the table already exists or
    /// the key schema is empty or longer than two attributes.
    pub fn create_table(&self, name: &str, key_schema: &[&str]) -> StoreResult<()> {
        if key_schema.is_empty() || key_schema.len() > 2 {
            return Err(StoreError::invalid_request(format!(
                "key schema must name one or two attributes, got {}",
                key_schema.len()
            )));
        }

        let mut tables = self.tables.write();
        if tables.contains_key(name) {
            return Err(StoreError::invalid_request(format!(
                "table {name} already exists"
            )));
        }
        let schema = key_schema.iter().map(|s| (*s).to_string()).collect();
        tables.insert(name.to_string(), Table::new(schema));
        Ok(())
    }

    /// Returns the key schema of a table.
    #[must_use]
    pub fn key_schema(&self, table: &str) -> Option<Vec<String>> {
        self.tables.read().get(table).map(|t| t.key_schema.clone())
    }

    /// Returns the names of all tables.
    #[must_use]
    pub fn table_names(&self) -> Vec<String> {
        self.tables.read().keys().cloned().collect()
    }

    /// Returns the number of items in a table (zero for unknown tables).
    #[must_use]
    pub fn item_count(&self, table: &str) -> usize {
        self.tables.read().get(table).map_or(0, |t| t.items.len())
    }

    /// Returns every item in a table, ordered by key.
    #[must_use]
    pub fn items(&self, table: &str) -> Vec<Item> {
        self.tables
            .read()
            .get(table)
            .map(|t| t.items.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Captures the full contents of the store.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let tables = self
            .tables
            .read()
            .iter()
            .map(|(name, table)| {
                let snapshot = TableSnapshot {
                    key_schema: table.key_schema.clone(),
                    items: table.items.values().cloned().collect(),
                };
                (name.clone(), snapshot)
            })
            .collect();
        StoreSnapshot { tables }
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRequest`] if an item lacks a valid key
    /// or two items share a key.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> StoreResult<Self> {
        let mut tables = BTreeMap::new();
        for (name, table_snapshot) in snapshot.tables {
            let mut table = Table::new(table_snapshot.key_schema);
            for item in table_snapshot.items {
                let slot = table.slot(&name, &item)?;
                if table.items.insert(slot, item).is_some() {
                    return Err(StoreError::invalid_request(format!(
                        "duplicate key in table {name}"
                    )));
                }
            }
            tables.insert(name, table);
        }
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }
}

fn lookup<'a>(tables: &'a BTreeMap<String, Table>, name: &str) -> StoreResult<&'a Table> {
    tables.get(name).ok_or_else(|| StoreError::table_not_found(name))
}

impl ItemStore for InMemoryStore {
    fn get_item(&self, ctx: &Context, request: &GetRequest) -> StoreResult<Item> {
        ctx.check()?;

        let tables = self.tables.read();
        let table = lookup(&tables, &request.table_name)?;
        let slot = table.exact_slot(&request.table_name, &request.key)?;
        Ok(table.items.get(&slot).cloned().unwrap_or_default())
    }

    fn put_item(&self, ctx: &Context, request: &PutRequest) -> StoreResult<()> {
        ctx.check()?;

        let mut tables = self.tables.write();
        let table = tables
            .get_mut(&request.table_name)
            .ok_or_else(|| StoreError::table_not_found(&request.table_name))?;
        let slot = table.slot(&request.table_name, &request.item)?;

        if let Some(condition) = &request.condition {
            if !condition.evaluate(table.items.get(&slot)) {
                return Err(StoreError::ConditionFailed {
                    table: request.table_name.clone(),
                });
            }
        }

        table.items.insert(slot, request.item.clone());
        Ok(())
    }

    fn transact_write(&self, ctx: &Context, requests: &[PutRequest]) -> StoreResult<()> {
        ctx.check()?;

        if requests.is_empty() {
            return Err(StoreError::invalid_request(
                "transaction must contain at least one operation",
            ));
        }
        if requests.len() > MAX_TRANSACTION_ITEMS {
            return Err(StoreError::invalid_request(format!(
                "transaction contains {} operations, limit is {MAX_TRANSACTION_ITEMS}",
                requests.len()
            )));
        }

        let mut tables = self.tables.write();

        // Resolve every target and check conditions before touching anything.
        let mut targets = Vec::with_capacity(requests.len());
        let mut seen = HashSet::with_capacity(requests.len());
        for request in requests {
            let slot = lookup(&tables, &request.table_name)?.slot(&request.table_name, &request.item)?;
            if !seen.insert((request.table_name.as_str(), slot.clone())) {
                return Err(StoreError::invalid_request(
                    "transaction cannot include multiple operations on one item",
                ));
            }
            targets.push(slot);
        }

        let mut reasons = Vec::with_capacity(requests.len());
        let mut failed = false;
        for (request, slot) in requests.iter().zip(&targets) {
            let current = tables
                .get(&request.table_name)
                .and_then(|t| t.items.get(slot));
            let holds = request
                .condition
                .as_ref()
                .map_or(true, |condition| condition.evaluate(current));
            if holds {
                reasons.push(CancellationReason::None);
            } else {
                failed = true;
                reasons.push(CancellationReason::ConditionalCheckFailed);
            }
        }
        if failed {
            return Err(StoreError::TransactionCanceled { reasons });
        }

        for (request, slot) in requests.iter().zip(targets) {
            if let Some(table) = tables.get_mut(&request.table_name) {
                table.items.insert(slot, request.item.clone());
            }
        }
        Ok(())
    }
}
