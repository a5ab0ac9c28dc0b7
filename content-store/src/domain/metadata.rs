//! Canonical JSON encoding for metadata uploads.
//!
//! Content identifiers are derived from exact bytes, so two semantically equal
//! metadata objects must encode identically. The rule applied here: object keys
//! are sorted by byte-wise string order at every depth, array order is kept,
//! and the output is compact UTF-8 with no insignificant whitespace.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("metadata must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("Metadata cannot be empty")]
    Empty,
    #[error("metadata is not serializable: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Encodes `metadata` into its canonical byte form.
///
/// Fails when the value is not a JSON object or has no keys.
pub fn canonical_json<T: Serialize + ?Sized>(metadata: &T) -> Result<Vec<u8>, MetadataError> {
    let value = serde_json::to_value(metadata)?;
    let object = match value {
        Value::Object(object) if object.is_empty() => return Err(MetadataError::Empty),
        Value::Object(object) => object,
        other => return Err(MetadataError::NotAnObject(kind(&other))),
    };

    let canonical = Value::Object(sort_object(object));
    Ok(serde_json::to_vec(&canonical)?)
}

fn sort_object(object: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = object.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    entries
        .into_iter()
        .map(|(key, value)| (key, canonicalize(value)))
        .collect()
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(object) => Value::Object(sort_object(object)),
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct NameFirst {
        name: &'static str,
        image: &'static str,
    }

    #[derive(Serialize)]
    struct ImageFirst {
        image: &'static str,
        name: &'static str,
    }

    #[test]
    fn test_keys_sorted_at_every_depth() {
        let metadata = json!({
            "name": "Seed #1",
            "attributes": [{"value": 3, "trait_type": "rarity"}],
            "details": {"z": true, "a": null},
        });

        let encoded = canonical_json(&metadata).unwrap();
        assert_eq!(
            String::from_utf8(encoded).unwrap(),
            r#"{"attributes":[{"trait_type":"rarity","value":3}],"details":{"a":null,"z":true},"name":"Seed #1"}"#
        );
    }

    #[test]
    fn test_field_declaration_order_does_not_matter() {
        let a = NameFirst {
            name: "token",
            image: "ipfs://QmImage",
        };
        let b = ImageFirst {
            image: "ipfs://QmImage",
            name: "token",
        };

        assert_eq!(canonical_json(&a).unwrap(), canonical_json(&b).unwrap());
    }

    #[test]
    fn test_array_order_is_preserved() {
        let encoded = canonical_json(&json!({"list": [3, 1, 2]})).unwrap();
        assert_eq!(encoded, br#"{"list":[3,1,2]}"#.to_vec());
    }

    #[test]
    fn test_empty_object_rejected() {
        let result = canonical_json(&json!({}));
        assert!(matches!(result, Err(MetadataError::Empty)));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(
            canonical_json(&json!(null)),
            Err(MetadataError::NotAnObject("null"))
        ));
        assert!(matches!(
            canonical_json(&json!([1, 2])),
            Err(MetadataError::NotAnObject("an array"))
        ));
    }
}
