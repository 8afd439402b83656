//! Conversion between serde types and DynamoDB attribute maps.
//!
//! Values pass through `serde_json::Value`: strings become `S`, numbers `N`,
//! booleans `Bool`, null `Null`, arrays `L` and objects `M`.

use aws_sdk_dynamodb::types::AttributeValue;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use thiserror::Error;

pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("record must serialize to a map")]
    NotAMap,
    #[error("attribute `{0}` has an unsupported type")]
    UnsupportedAttribute(String),
    #[error("attribute `{name}` holds an invalid number `{value}`")]
    InvalidNumber { name: String, value: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub fn to_item<T: Serialize>(value: &T) -> Result<Item, RecordError> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields
            .into_iter()
            .map(|(name, value)| (name, to_attribute(value)))
            .collect()),
        _ => Err(RecordError::NotAMap),
    }
}

pub fn from_item<T: DeserializeOwned>(item: &Item) -> Result<T, RecordError> {
    let mut fields = Map::with_capacity(item.len());
    for (name, attr) in item {
        fields.insert(name.clone(), from_attribute(name, attr)?);
    }
    Ok(serde_json::from_value(Value::Object(fields))?)
}

fn to_attribute(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s),
        Value::Array(values) => AttributeValue::L(values.into_iter().map(to_attribute).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(name, value)| (name, to_attribute(value)))
                .collect(),
        ),
    }
}

fn from_attribute(name: &str, attr: &AttributeValue) -> Result<Value, RecordError> {
    match attr {
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::N(n) => n
            .parse::<Number>()
            .map(Value::Number)
            .map_err(|_| RecordError::InvalidNumber {
                name: name.to_string(),
                value: n.clone(),
            }),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::L(values) => values
            .iter()
            .map(|v| from_attribute(name, v))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        AttributeValue::M(fields) => {
            let mut map = Map::with_capacity(fields.len());
            for (key, v) in fields {
                map.insert(key.clone(), from_attribute(key, v)?);
            }
            Ok(Value::Object(map))
        }
        _ => Err(RecordError::UnsupportedAttribute(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::User;
    use aws_sdk_dynamodb::primitives::Blob;

    #[test]
    fn user_encodes_as_string_attributes() {
        let item = to_item(&User::new("a@b.co", "Ada", "Lovelace")).unwrap();
        assert_eq!(item.len(), 3);
        assert_eq!(item["email"], AttributeValue::S("a@b.co".to_string()));
        assert_eq!(item["firstName"], AttributeValue::S("Ada".to_string()));
        assert_eq!(item["lastName"], AttributeValue::S("Lovelace".to_string()));
    }

    #[test]
    fn user_decodes_with_missing_attributes() {
        let mut item = Item::new();
        item.insert("email".to_string(), AttributeValue::S("a@b.co".to_string()));
        let user: User = from_item(&item).unwrap();
        assert_eq!(user, User::new("a@b.co", "", ""));
    }

    #[test]
    fn nested_values_keep_their_shape() {
        let value = serde_json::json!({"n": 42, "tags": ["x", null], "meta": {"ok": true}});
        let item = to_item(&value).unwrap();
        assert_eq!(item["n"], AttributeValue::N("42".to_string()));
        let back: Value = from_item(&item).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn non_map_values_are_rejected() {
        assert!(matches!(to_item(&"plain"), Err(RecordError::NotAMap)));
    }

    #[test]
    fn binary_attributes_are_unsupported() {
        let mut item = Item::new();
        item.insert(
            "email".to_string(),
            AttributeValue::B(Blob::new(b"raw".to_vec())),
        );
        let err = from_item::<User>(&item).unwrap_err();
        assert!(matches!(err, RecordError::UnsupportedAttribute(name) if name == "email"));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let mut item = Item::new();
        item.insert("n".to_string(), AttributeValue::N("1.2.3".to_string()));
        let err = from_item::<Value>(&item).unwrap_err();
        assert!(matches!(err, RecordError::InvalidNumber { .. }));
    }

    #[test]
    fn wrong_attribute_type_fails_decoding() {
        let mut item = Item::new();
        item.insert("email".to_string(), AttributeValue::Bool(true));
        assert!(matches!(
            from_item::<User>(&item),
            Err(RecordError::Json(_))
        ));
    }
}
