//! Primary keys and the guards derived from them.

use crate::error::{CoreError, CoreResult};
use dynamorm_codec::{AttributeValue, Item};
use dynamorm_storage::Condition;
use std::collections::BTreeMap;
use std::fmt;

/// The attributes that uniquely identify an item.
///
/// Attributes are kept sorted by name, so two keys with the same attributes
/// compare equal regardless of insertion order, and guards derived from a
/// key always list attributes in the same order.
///
/// ```
/// use dynamorm_core::Key;
///
/// let key = Key::new().with("PK", "001").with("SK", "profile");
/// assert_eq!(key.key_value("PK"), Some("001"));
/// assert_eq!(
///     key.guard_for_create().unwrap().build().expression(),
///     "(attribute_not_exists (#0)) AND (attribute_not_exists (#1))"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Key {
    attributes: BTreeMap<String, AttributeValue>,
}

impl Key {
    /// Creates an empty key.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a single-attribute key with a string value.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new().with(name, AttributeValue::S(value.into()))
    }

    /// Adds an attribute, replacing any previous value for the name.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds an attribute, returning the previous value for the name.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.attributes.insert(name.into(), value.into())
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns the value of a string attribute.
    #[must_use]
    pub fn key_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(AttributeValue::as_s)
    }

    /// Iterates attribute names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Returns the number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if the key has no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Returns the attributes as an item.
    #[must_use]
    pub fn attributes(&self) -> &Item {
        &self.attributes
    }

    /// Converts the key into an item holding only the key attributes.
    #[must_use]
    pub fn into_item(self) -> Item {
        self.attributes
    }

    /// Extracts a key from an item.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingKey`] if `names` is empty, or
    /// [`CoreError::InvalidKey`] if the item lacks one of the attributes.
    pub fn from_item(item: &Item, names: &[&str]) -> CoreResult<Self> {
        if names.is_empty() {
            return Err(CoreError::MissingKey);
        }
        let mut key = Self::new();
        for name in names {
            let value = item
                .get(*name)
                .ok_or_else(|| CoreError::invalid_key(format!("item has no {name} attribute")))?;
            key.insert(*name, value.clone());
        }
        key.validate()?;
        Ok(key)
    }

    /// Checks that the key can address an item.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingKey`] for a key without attributes, or
    /// [`CoreError::InvalidKey`] for an empty attribute name or a value that
    /// is not a string, number or binary.
    pub fn validate(&self) -> CoreResult<()> {
        if self.is_empty() {
            return Err(CoreError::MissingKey);
        }
        for (name, value) in &self.attributes {
            if name.is_empty() {
                return Err(CoreError::invalid_key("attribute name is empty"));
            }
            if !value.is_key_scalar() {
                return Err(CoreError::invalid_key(format!(
                    "{name} has type {}, expected S, N or B",
                    value.type_descriptor()
                )));
            }
        }
        Ok(())
    }

    /// Guard asserting that no key attribute exists yet.
    ///
    /// # Errors
    ///
    /// Fails like [`Key::validate`].
    pub fn guard_for_create(&self) -> CoreResult<Condition> {
        self.guard(Condition::attribute_not_exists)
    }

    /// Guard asserting that every key attribute already exists.
    ///
    /// # Errors
    ///
    /// Fails like [`Key::validate`].
    pub fn guard_for_update(&self) -> CoreResult<Condition> {
        self.guard(Condition::attribute_exists)
    }

    fn guard(&self, predicate: fn(String) -> Condition) -> CoreResult<Condition> {
        self.validate()?;
        Condition::all(self.attributes.keys().cloned().map(predicate)).ok_or(CoreError::MissingKey)
    }
}

impl From<Item> for Key {
    fn from(attributes: Item) -> Self {
        Self { attributes }
    }
}

impl<N: Into<String>, V: Into<AttributeValue>> FromIterator<(N, V)> for Key {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            attributes: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.attributes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}
