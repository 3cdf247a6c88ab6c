//! Dynamic attribute value type.

use crate::number::normalize_number;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An item: attribute names mapped to attribute values.
///
/// A `BTreeMap` keeps attribute order deterministic, which keeps rendered
/// requests and snapshots stable.
pub type Item = BTreeMap<String, AttributeValue>;

/// A dynamic attribute value as understood by the item store.
///
/// Numbers are carried as decimal text, exactly as the store transmits them.
/// The serde representation is the store's tagged JSON form, e.g.
/// `{"S":"hello"}` or `{"N":"42"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeValue {
    /// UTF-8 string.
    #[serde(rename = "S")]
    S(String),
    /// Number, as decimal text.
    #[serde(rename = "N")]
    N(String),
    /// Binary blob.
    #[serde(rename = "B")]
    B(Vec<u8>),
    /// Boolean.
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Null.
    #[serde(rename = "NULL")]
    Null,
    /// Ordered list of values.
    #[serde(rename = "L")]
    L(Vec<AttributeValue>),
    /// Nested map.
    #[serde(rename = "M")]
    M(BTreeMap<String, AttributeValue>),
    /// String set.
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// Number set.
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// Binary set.
    #[serde(rename = "BS")]
    Bs(Vec<Vec<u8>>),
}

impl AttributeValue {
    /// Returns the store's type descriptor for this value (`"S"`, `"N"`, ...).
    #[must_use]
    pub const fn type_descriptor(&self) -> &'static str {
        match self {
            AttributeValue::S(_) => "S",
            AttributeValue::N(_) => "N",
            AttributeValue::B(_) => "B",
            AttributeValue::Bool(_) => "BOOL",
            AttributeValue::Null => "NULL",
            AttributeValue::L(_) => "L",
            AttributeValue::M(_) => "M",
            AttributeValue::Ss(_) => "SS",
            AttributeValue::Ns(_) => "NS",
            AttributeValue::Bs(_) => "BS",
        }
    }

    /// Returns true for the scalar types that may appear in a primary key.
    #[must_use]
    pub const fn is_key_scalar(&self) -> bool {
        matches!(
            self,
            AttributeValue::S(_) | AttributeValue::N(_) | AttributeValue::B(_)
        )
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Get this value as a string, if it is one.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Get the decimal text of this value, if it is a number.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    /// Get this value as bytes, if it is binary.
    pub fn as_b(&self) -> Option<&[u8]> {
        match self {
            AttributeValue::B(b) => Some(b),
            _ => None,
        }
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as a list, if it is one.
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::L(l) => Some(l),
            _ => None,
        }
    }

    /// Get this value as a map, if it is one.
    pub fn as_m(&self) -> Option<&BTreeMap<String, AttributeValue>> {
        match self {
            AttributeValue::M(m) => Some(m),
            _ => None,
        }
    }

    /// Look up a key in this map value.
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.as_m().and_then(|m| m.get(key))
    }

    /// Returns this value with every number respelled canonically and every
    /// set sorted, so equal values compare equal however they were written.
    ///
    /// Number text that does not parse is kept as written.
    #[must_use]
    pub fn canonical(&self) -> AttributeValue {
        let number = |text: &String| normalize_number(text).unwrap_or_else(|_| text.clone());
        match self {
            AttributeValue::N(n) => AttributeValue::N(number(n)),
            AttributeValue::L(items) => {
                AttributeValue::L(items.iter().map(AttributeValue::canonical).collect())
            }
            AttributeValue::M(map) => AttributeValue::M(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.canonical()))
                    .collect(),
            ),
            AttributeValue::Ss(set) => {
                let mut set = set.clone();
                set.sort();
                set.dedup();
                AttributeValue::Ss(set)
            }
            AttributeValue::Ns(set) => {
                let mut set: Vec<String> = set.iter().map(number).collect();
                set.sort();
                set.dedup();
                AttributeValue::Ns(set)
            }
            AttributeValue::Bs(set) => {
                let mut set = set.clone();
                set.sort();
                set.dedup();
                AttributeValue::Bs(set)
            }
            other => other.clone(),
        }
    }

    /// Compares two values as numbers, sets and nested documents rather than
    /// as raw text.
    pub fn same_as(&self, other: &AttributeValue) -> bool {
        self == other || self.canonical() == other.canonical()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::S(s) => write!(f, "{s:?}"),
            AttributeValue::N(n) => write!(f, "{n}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Null => write!(f, "null"),
            other => write!(f, "<{}>", other.type_descriptor()),
        }
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => AttributeValue::Null,
            Json::Bool(b) => AttributeValue::Bool(b),
            Json::Number(n) => AttributeValue::N(n.to_string()),
            Json::String(s) => AttributeValue::S(s),
            Json::Array(items) => {
                AttributeValue::L(items.into_iter().map(AttributeValue::from).collect())
            }
            Json::Object(map) => AttributeValue::M(
                map.into_iter()
                    .map(|(k, v)| (k, AttributeValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::N(n.to_string())
    }
}

impl From<i32> for AttributeValue {
    fn from(n: i32) -> Self {
        AttributeValue::N(n.to_string())
    }
}

impl From<u32> for AttributeValue {
    fn from(n: u32) -> Self {
        AttributeValue::N(n.to_string())
    }
}

impl From<u64> for AttributeValue {
    fn from(n: u64) -> Self {
        AttributeValue::N(n.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::S(s)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::S(s.to_string())
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(b: Vec<u8>) -> Self {
        AttributeValue::B(b)
    }
}

impl From<&[u8]> for AttributeValue {
    fn from(b: &[u8]) -> Self {
        AttributeValue::B(b.to_vec())
    }
}

impl From<()> for AttributeValue {
    fn from((): ()) -> Self {
        AttributeValue::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn key_scalars() {
        assert!(AttributeValue::from("a").is_key_scalar());
        assert!(AttributeValue::from(7i64).is_key_scalar());
        assert!(AttributeValue::from(vec![1u8]).is_key_scalar());
        assert!(!AttributeValue::Bool(true).is_key_scalar());
        assert!(!AttributeValue::Null.is_key_scalar());
        assert!(!AttributeValue::L(vec![]).is_key_scalar());
    }

    #[test]
    fn value_accessors() {
        assert!(AttributeValue::Null.is_null());
        assert_eq!(AttributeValue::from("hi").as_s(), Some("hi"));
        assert_eq!(AttributeValue::from(42i32).as_n(), Some("42"));
        assert_eq!(AttributeValue::from(42i32).as_s(), None);
        assert_eq!(AttributeValue::Bool(false).as_bool(), Some(false));
        assert_eq!(
            AttributeValue::B(vec![1, 2]).as_b(),
            Some(&[1u8, 2][..])
        );
    }

    #[test]
    fn from_json_maps_every_shape() {
        let value = AttributeValue::from(json!({
            "name": "Alice",
            "age": 30,
            "score": 1.5,
            "active": true,
            "nickname": null,
            "tags": ["a", "b"]
        }));

        assert_eq!(value.get("name"), Some(&AttributeValue::from("Alice")));
        assert_eq!(value.get("age"), Some(&AttributeValue::N("30".into())));
        assert_eq!(value.get("score"), Some(&AttributeValue::N("1.5".into())));
        assert_eq!(value.get("active"), Some(&AttributeValue::Bool(true)));
        assert_eq!(value.get("nickname"), Some(&AttributeValue::Null));
        assert_eq!(
            value.get("tags"),
            Some(&AttributeValue::L(vec!["a".into(), "b".into()]))
        );
        assert_eq!(value.get("missing"), None);
    }

    #[test]
    fn tagged_json_representation() {
        let encoded = serde_json::to_string(&AttributeValue::from("001")).unwrap();
        assert_eq!(encoded, r#"{"S":"001"}"#);

        let decoded: AttributeValue = serde_json::from_str(r#"{"N":"12"}"#).unwrap();
        assert_eq!(decoded, AttributeValue::N("12".into()));

        let decoded: AttributeValue = serde_json::from_str(r#"{"SS":["x","y"]}"#).unwrap();
        assert_eq!(decoded, AttributeValue::Ss(vec!["x".into(), "y".into()]));
    }

    #[test]
    fn numbers_compare_by_value() {
        let seven = AttributeValue::N("7".into());
        assert!(seven.same_as(&AttributeValue::N("7.0".into())));
        assert!(seven.same_as(&AttributeValue::N("0.7e1".into())));
        assert!(!seven.same_as(&AttributeValue::N("7.5".into())));
        assert!(!seven.same_as(&AttributeValue::from("7")));
        assert_eq!(
            AttributeValue::N("bogus".into()).canonical(),
            AttributeValue::N("bogus".into())
        );
    }

    #[test]
    fn canonical_form_reaches_into_documents_and_sets() {
        let written = AttributeValue::M(BTreeMap::from([
            ("n".to_string(), AttributeValue::L(vec![AttributeValue::N("1.50".into())])),
            ("ns".to_string(), AttributeValue::Ns(vec!["2.0".into(), "1".into(), "2".into()])),
        ]));
        let expected = AttributeValue::M(BTreeMap::from([
            ("n".to_string(), AttributeValue::L(vec![AttributeValue::N("1.5".into())])),
            ("ns".to_string(), AttributeValue::Ns(vec!["1".into(), "2".into()])),
        ]));
        assert_eq!(written.canonical(), expected);
        assert!(AttributeValue::Ss(vec!["b".into(), "a".into()])
            .same_as(&AttributeValue::Ss(vec!["a".into(), "b".into()])));
    }

    #[test]
    fn display_is_compact() {
        assert_eq!(AttributeValue::from("a").to_string(), "\"a\"");
        assert_eq!(AttributeValue::from(3i64).to_string(), "3");
        assert_eq!(AttributeValue::M(BTreeMap::new()).to_string(), "<M>");
    }
}
