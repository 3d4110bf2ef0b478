//! Tests for the extract module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use test_case::test_case;

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: String,
    #[serde(default)]
    size: u32,
}

// ============================================================================
// extract_many
// ============================================================================

#[test]
fn test_extract_many_preserves_order() {
    let body = json!({
        "results": [{"id": "c"}, {"id": "a"}, {"id": "b"}, {"id": "a"}]
    });

    let items: Vec<Item> = extract_many(&body, DEFAULT_COLLECTION_KEY).unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b", "a"]);
}

#[test_case(json!({"results": []}) ; "empty list")]
#[test_case(json!({"results": null}) ; "null field")]
#[test_case(json!({"links": []}) ; "absent field")]
#[test_case(json!({}) ; "empty object")]
fn test_extract_many_empty_is_not_an_error(body: serde_json::Value) {
    let items: Vec<Item> = extract_many(&body, DEFAULT_COLLECTION_KEY).unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_extract_many_custom_key() {
    let body = json!({"items": [{"id": "x", "size": 3}], "results": [{"id": "ignored"}]});

    let items: Vec<Item> = extract_many(&body, "items").unwrap();
    assert_eq!(items, vec![Item { id: "x".into(), size: 3 }]);
}

#[test]
fn test_extract_many_ignores_unknown_fields() {
    let body = json!({"results": [{"id": "x", "colour": "blue"}]});

    let items: Vec<Item> = extract_many(&body, "results").unwrap();
    assert_eq!(items[0].id, "x");
}

#[test]
fn test_extract_many_missing_field_names_field_and_type() {
    let body = json!({"results": [{"id": "ok"}, {"size": 1}]});

    let err = extract_many::<Item>(&body, "results").unwrap_err();
    match &err {
        Error::Decode { target, message } => {
            assert_eq!(target, "Item");
            assert!(message.contains("results[1]"), "{message}");
            assert!(message.contains("missing field `id`"), "{message}");
        }
        other => panic!("Expected Decode, got {other:?}"),
    }
}

#[test]
fn test_extract_many_rejects_non_list() {
    let body = json!({"results": {"id": "x"}});

    let err = extract_many::<Item>(&body, "results").unwrap_err();
    assert!(err.to_string().contains("expected a list"));
}

// ============================================================================
// extract_one
// ============================================================================

#[test]
fn test_extract_one_unwrapped_body() {
    let body = json!({"id": "single", "size": 10});

    let item: Item = extract_one(&body).unwrap();
    assert_eq!(item, Item { id: "single".into(), size: 10 });
}

#[test]
fn test_extract_one_wrong_type() {
    let body = json!({"id": 42});

    let err = extract_one::<Item>(&body).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
    assert!(err.to_string().contains("Item"));
}

#[test]
fn test_extract_one_slice() {
    let item: Item = extract_one_slice(br#"{"id": "raw"}"#).unwrap();
    assert_eq!(item.id, "raw");

    let err = extract_one_slice::<Item>(b"not json").unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_type_label() {
    assert_eq!(type_label::<Item>(), "Item");
    assert_eq!(type_label::<Vec<Item>>(), "Vec<Item>");
    assert_eq!(type_label::<u32>(), "u32");
}
