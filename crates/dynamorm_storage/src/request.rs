//! Request types sent to an item store.

use crate::expression::Expression;
use dynamorm_codec::Item;
use serde::Serialize;

/// Reads one item by its full primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetRequest {
    /// Table to read from.
    #[serde(rename = "TableName")]
    pub table_name: String,
    /// Every primary-key attribute, and nothing else.
    #[serde(rename = "Key")]
    pub key: Item,
    /// Whether the read must observe all prior successful writes.
    #[serde(rename = "ConsistentRead")]
    pub consistent_read: bool,
}

impl GetRequest {
    /// Creates an eventually consistent read.
    pub fn new(table_name: impl Into<String>, key: Item) -> Self {
        Self {
            table_name: table_name.into(),
            key,
            consistent_read: false,
        }
    }

    /// Sets whether the read is strongly consistent.
    #[must_use]
    pub fn consistent(mut self, value: bool) -> Self {
        self.consistent_read = value;
        self
    }
}

/// Writes one whole item, optionally guarded by a condition.
///
/// Used both for single conditional puts and as a member of a
/// transactional write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutRequest {
    /// Table to write to.
    #[serde(rename = "TableName")]
    pub table_name: String,
    /// The full item, including its primary-key attributes.
    #[serde(rename = "Item")]
    pub item: Item,
    /// Guard evaluated against the current item before writing.
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expression>,
}

impl PutRequest {
    /// Creates an unconditional put.
    pub fn new(table_name: impl Into<String>, item: Item) -> Self {
        Self {
            table_name: table_name.into(),
            item,
            condition: None,
        }
    }

    /// Attaches a guard condition.
    #[must_use]
    pub fn with_condition(mut self, condition: impl Into<Expression>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Returns the rendered guard text, if any.
    #[must_use]
    pub fn condition_expression(&self) -> Option<&str> {
        self.condition.as_ref().map(Expression::expression)
    }
}
