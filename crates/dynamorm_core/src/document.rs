//! Schemaless entities.

use crate::entity::{ConditionSlot, Entity};
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use dynamorm_codec::{AttributeValue, CodecError, Item};
use dynamorm_storage::Expression;
use serde_json::{Map, Value};

/// An entity backed by a JSON object.
///
/// The key is read from the body using a fixed list of attribute names.
/// Useful for tooling and for tables without a dedicated model type.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    key_names: Vec<String>,
    body: Map<String, Value>,
    guard: ConditionSlot,
}

impl Document {
    /// Creates a document, checking that every key attribute is present and
    /// is a string or a number.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingKey`] if `key_names` is empty, or
    /// [`CoreError::InvalidKey`] for a missing or non-scalar key attribute.
    pub fn new(key_names: &[&str], body: Map<String, Value>) -> CoreResult<Self> {
        if key_names.is_empty() {
            return Err(CoreError::MissingKey);
        }
        for name in key_names {
            match body.get(*name) {
                Some(Value::String(_) | Value::Number(_)) => {}
                Some(_) => {
                    return Err(CoreError::invalid_key(format!(
                        "{name} must be a string or a number"
                    )))
                }
                None => {
                    return Err(CoreError::invalid_key(format!(
                        "document has no {name} attribute"
                    )))
                }
            }
        }

        Ok(Self {
            key_names: key_names.iter().map(|n| (*n).to_string()).collect(),
            body,
            guard: ConditionSlot::new(),
        })
    }

    /// Creates a document from any JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] if `value` is not an object, or
    /// any error from [`Document::new`].
    pub fn from_json(key_names: &[&str], value: Value) -> CoreResult<Self> {
        match value {
            Value::Object(body) => Self::new(key_names, body),
            other => Err(CoreError::Serialization(CodecError::NotAMap {
                found: json_kind(&other),
            })),
        }
    }

    /// Returns the key attribute names.
    #[must_use]
    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Returns the body.
    #[must_use]
    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    /// Consumes the document, returning its body.
    #[must_use]
    pub fn into_body(self) -> Map<String, Value> {
        self.body
    }

    /// Returns one attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// Sets one attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.body.insert(name.into(), value.into());
    }

    /// Replaces the key-derived guard for the next save.
    pub fn set_condition(&mut self, condition: impl Into<Expression>) {
        self.guard.set(condition);
    }
}

impl Entity for Document {
    type Item = Map<String, Value>;

    fn item(&self) -> &Self::Item {
        &self.body
    }

    fn key(&self) -> Key {
        self.key_names
            .iter()
            .filter_map(|name| {
                self.body
                    .get(name)
                    .map(|value| (name.clone(), AttributeValue::from(value.clone())))
            })
            .collect()
    }

    fn condition(&self) -> Option<Expression> {
        self.guard.get().cloned()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns a modeler producing [`Document`]s keyed by `key_names`.
pub fn document_modeler(
    key_names: &[&str],
) -> impl Fn(&Item) -> CoreResult<Document> + Send + Sync + 'static {
    let key_names: Vec<String> = key_names.iter().map(|n| (*n).to_string()).collect();
    move |item: &Item| {
        let body: Map<String, Value> = dynamorm_codec::from_item(item).map_err(CoreError::Decode)?;
        let names: Vec<&str> = key_names.iter().map(String::as_str).collect();
        Document::new(&names, body)
    }
}
