//! Typed extraction from response bodies
//!
//! Collection pages nest their resources under a collection field
//! (`results` for every resource family this client knows); single-resource
//! responses are the resource object itself. Both paths decode into any
//! `T: DeserializeOwned` and report failures with the target type and the
//! offending field.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Collection field used by every paginated endpoint
pub const DEFAULT_COLLECTION_KEY: &str = "results";

/// Decode `body[key]` into an ordered list.
///
/// A missing, `null` or empty field yields an empty list. Each element is
/// decoded on its own so a failure names its position.
pub fn extract_many<T: DeserializeOwned>(body: &JsonValue, key: &str) -> Result<Vec<T>> {
    let items = match body.get(key) {
        None | Some(JsonValue::Null) => return Ok(Vec::new()),
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(Error::decode(
                type_label::<T>(),
                format!("field '{key}' is {}, expected a list", kind_of(other)),
            ))
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            T::deserialize(item)
                .map_err(|e| Error::decode(type_label::<T>(), format!("{key}[{index}]: {e}")))
        })
        .collect()
}

/// Decode a whole body into one value
pub fn extract_one<T: DeserializeOwned>(body: &JsonValue) -> Result<T> {
    T::deserialize(body).map_err(|e| Error::decode(type_label::<T>(), e.to_string()))
}

/// Decode raw response bytes into one value
pub fn extract_one_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::decode(type_label::<T>(), e.to_string()))
}

/// Short name of a type for error messages, e.g. `Cluster` or `Vec<Region>`
pub(crate) fn type_label<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let mut label = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            label.push_str(segment.rsplit("::").next().unwrap_or(&segment));
            segment.clear();
            label.push(c);
        }
    }
    label.push_str(segment.rsplit("::").next().unwrap_or(&segment));
    label
}

pub(crate) fn kind_of(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests;
