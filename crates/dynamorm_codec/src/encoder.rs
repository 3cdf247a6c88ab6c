//! Record to attribute-map encoder.

use crate::error::{CodecError, CodecResult};
use crate::finite::ensure_finite;
use crate::value::{AttributeValue, Item};
use serde::Serialize;
use serde_json::Value as Json;

/// Encode a serializable record into an item.
///
/// The record is first rendered through serde's data model, then each
/// field is mapped onto the store's type system:
/// - strings become `S`
/// - numbers become `N` (decimal text)
/// - booleans become `BOOL`
/// - `None` and unit become `NULL`
/// - sequences become `L`, nested structs and maps become `M`
///
/// # Errors
///
/// Returns an error if the record fails to serialize, holds a NaN or
/// infinite float, or does not serialize to a map (only maps can be stored
/// as items).
pub fn to_item<T: Serialize + ?Sized>(record: &T) -> CodecResult<Item> {
    match to_json(record)? {
        Json::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, AttributeValue::from(value)))
            .collect()),
        other => Err(CodecError::NotAMap {
            found: json_kind(&other),
        }),
    }
}

/// Encode a single serializable value into an attribute value.
///
/// # Errors
///
/// Returns an error if the value fails to serialize or holds a NaN or
/// infinite float.
pub fn to_attribute_value<T: Serialize + ?Sized>(value: &T) -> CodecResult<AttributeValue> {
    to_json(value).map(AttributeValue::from)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CodecResult<Json> {
    ensure_finite(value)?;
    serde_json::to_value(value).map_err(|e| CodecError::encoding_failed(e.to_string()))
}

pub(crate) fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Person {
        #[serde(rename = "PK")]
        pk: String,
        #[serde(rename = "Age")]
        age: u32,
        #[serde(rename = "Hobbies")]
        hobbies: Vec<String>,
        #[serde(rename = "Nickname", skip_serializing_if = "Option::is_none")]
        nickname: Option<String>,
        #[serde(rename = "Email")]
        email: Option<String>,
    }

    #[test]
    fn encodes_struct_fields() {
        let item = to_item(&Person {
            pk: "ABC".into(),
            age: 30,
            hobbies: vec!["reading".into(), "coding".into()],
            nickname: None,
            email: None,
        })
        .unwrap();

        assert_eq!(item.get("PK"), Some(&AttributeValue::S("ABC".into())));
        assert_eq!(item.get("Age"), Some(&AttributeValue::N("30".into())));
        assert_eq!(
            item.get("Hobbies"),
            Some(&AttributeValue::L(vec![
                AttributeValue::S("reading".into()),
                AttributeValue::S("coding".into()),
            ]))
        );
        assert!(!item.contains_key("Nickname"));
        assert_eq!(item.get("Email"), Some(&AttributeValue::Null));
    }

    #[test]
    fn encodes_maps() {
        let mut map = HashMap::new();
        map.insert("k", 1i64);
        let item = to_item(&map).unwrap();
        assert_eq!(item.get("k"), Some(&AttributeValue::N("1".into())));
    }

    #[test]
    fn rejects_non_map_records() {
        assert_eq!(
            to_item("just a string"),
            Err(CodecError::NotAMap { found: "string" })
        );
        assert_eq!(
            to_item(&vec![1, 2, 3]),
            Err(CodecError::NotAMap { found: "array" })
        );
    }

    #[test]
    fn rejects_non_string_map_keys() {
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1i64);
        assert!(matches!(
            to_item(&map),
            Err(CodecError::EncodingFailed { .. })
        ));
    }

    #[derive(Serialize)]
    struct Reading {
        #[serde(rename = "PK")]
        pk: String,
        #[serde(rename = "Value")]
        value: f64,
    }

    #[test]
    fn rejects_non_finite_floats() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = to_item(&Reading {
                pk: "r#1".into(),
                value,
            });
            assert!(
                matches!(result, Err(CodecError::EncodingFailed { .. })),
                "{value} encoded as {result:?}"
            );
        }
        assert!(matches!(
            to_attribute_value(&f32::NAN),
            Err(CodecError::EncodingFailed { .. })
        ));

        let item = to_item(&Reading {
            pk: "r#1".into(),
            value: 0.5,
        })
        .unwrap();
        assert_eq!(item.get("Value"), Some(&AttributeValue::N("0.5".into())));
    }

    #[test]
    fn single_value() {
        assert_eq!(
            to_attribute_value("001").unwrap(),
            AttributeValue::S("001".into())
        );
        assert_eq!(
            to_attribute_value(&-7i64).unwrap(),
            AttributeValue::N("-7".into())
        );
    }
}
