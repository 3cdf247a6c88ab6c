//! Attribute-map to record decoder.

use crate::error::{CodecError, CodecResult};
use crate::value::{AttributeValue, Item};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value as Json};

/// Decode an item into a record.
///
/// Sets (`SS`, `NS`, `BS`) decode as sequences and binary values decode as
/// byte sequences, so `Vec<String>` and `Vec<u8>` fields accept them.
///
/// # Errors
///
/// Returns an error if a number attribute is not valid decimal text, or if
/// the attributes do not match the shape of `T`.
pub fn from_item<T: DeserializeOwned>(item: &Item) -> CodecResult<T> {
    let mut fields = Map::new();
    for (name, value) in item {
        fields.insert(name.clone(), to_json(value)?);
    }
    serde_json::from_value(Json::Object(fields))
        .map_err(|e| CodecError::decoding_failed(e.to_string()))
}

/// Decode a single attribute value into a typed value.
///
/// # Errors
///
/// Returns an error if the attribute cannot be represented as `T`.
pub fn from_attribute_value<T: DeserializeOwned>(value: &AttributeValue) -> CodecResult<T> {
    serde_json::from_value(to_json(value)?).map_err(|e| CodecError::decoding_failed(e.to_string()))
}

fn to_json(value: &AttributeValue) -> CodecResult<Json> {
    Ok(match value {
        AttributeValue::S(s) => Json::String(s.clone()),
        AttributeValue::N(n) => Json::Number(parse_number(n)?),
        AttributeValue::B(b) => bytes_to_json(b),
        AttributeValue::Bool(b) => Json::Bool(*b),
        AttributeValue::Null => Json::Null,
        AttributeValue::L(items) => Json::Array(
            items
                .iter()
                .map(to_json)
                .collect::<CodecResult<Vec<_>>>()?,
        ),
        AttributeValue::M(map) => {
            let mut fields = Map::new();
            for (name, value) in map {
                fields.insert(name.clone(), to_json(value)?);
            }
            Json::Object(fields)
        }
        AttributeValue::Ss(strings) => {
            Json::Array(strings.iter().cloned().map(Json::String).collect())
        }
        AttributeValue::Ns(numbers) => Json::Array(
            numbers
                .iter()
                .map(|n| parse_number(n).map(Json::Number))
                .collect::<CodecResult<Vec<_>>>()?,
        ),
        AttributeValue::Bs(blobs) => Json::Array(blobs.iter().map(|b| bytes_to_json(b)).collect()),
    })
}

fn bytes_to_json(bytes: &[u8]) -> Json {
    Json::Array(bytes.iter().map(|b| Json::Number(Number::from(*b))).collect())
}

fn parse_number(text: &str) -> CodecResult<Number> {
    let trimmed = text.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Number::from(n));
    }
    if let Ok(n) = trimmed.parse::<u64>() {
        return Ok(Number::from(n));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| CodecError::invalid_number(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Person {
        #[serde(rename = "PK")]
        pk: String,
        #[serde(rename = "Age")]
        age: u32,
        #[serde(rename = "Hobbies", default)]
        hobbies: Vec<String>,
        #[serde(rename = "Nickname", default)]
        nickname: Option<String>,
    }

    fn person_item() -> Item {
        let mut item = Item::new();
        item.insert("PK".into(), AttributeValue::S("ABC".into()));
        item.insert("Age".into(), AttributeValue::N("30".into()));
        item.insert(
            "Hobbies".into(),
            AttributeValue::Ss(vec!["reading".into(), "coding".into()]),
        );
        item
    }

    #[test]
    fn decodes_struct_with_string_set() {
        let person: Person = from_item(&person_item()).unwrap();
        assert_eq!(
            person,
            Person {
                pk: "ABC".into(),
                age: 30,
                hobbies: vec!["reading".into(), "coding".into()],
                nickname: None,
            }
        );
    }

    #[test]
    fn null_decodes_as_none() {
        let mut item = person_item();
        item.insert("Nickname".into(), AttributeValue::Null);
        let person: Person = from_item(&item).unwrap();
        assert_eq!(person.nickname, None);
    }

    #[test]
    fn invalid_number_is_reported() {
        let mut item = person_item();
        item.insert("Age".into(), AttributeValue::N("thirty".into()));
        assert_eq!(
            from_item::<Person>(&item),
            Err(CodecError::invalid_number("thirty"))
        );
    }

    #[test]
    fn shape_mismatch_is_decoding_error() {
        let mut item = person_item();
        item.remove("PK");
        assert!(matches!(
            from_item::<Person>(&item),
            Err(CodecError::DecodingFailed { .. })
        ));
    }

    #[test]
    fn decimal_numbers() {
        let value: f64 = from_attribute_value(&AttributeValue::N("2.25".into())).unwrap();
        assert!((value - 2.25).abs() < f64::EPSILON);
    }

    #[test]
    fn binary_decodes_as_bytes() {
        let bytes: Vec<u8> = from_attribute_value(&AttributeValue::B(vec![0, 255])).unwrap();
        assert_eq!(bytes, vec![0, 255]);
    }
}
