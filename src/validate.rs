//! Option validation
//!
//! Every option struct is checked before a request is built. A failed check
//! yields [`Error::Validation`] and nothing goes on the wire.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Canonical textual form of a version 4 UUID
static UUID4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Checks a value before it is sent
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Fail when a required string is empty or blank
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(())
}

/// Fail unless `value` is a version 4 UUID
pub fn require_uuid4(field: &str, value: &str) -> Result<()> {
    if !is_uuid4(value) {
        return Err(Error::validation(
            field,
            format!("'{value}' is not a valid UUIDv4"),
        ));
    }
    Ok(())
}

/// Fail unless every id in the list is a version 4 UUID
pub fn require_uuid4_all(field: &str, values: &[String]) -> Result<()> {
    for (index, value) in values.iter().enumerate() {
        require_uuid4(&format!("{field}[{index}]"), value)?;
    }
    Ok(())
}

/// Fail when a flag is set together with a non-empty list it excludes
pub fn require_exclusive(flag: &str, set: bool, list: &str, values: &[String]) -> Result<()> {
    if set && !values.is_empty() {
        return Err(Error::validation(
            flag,
            format!("cannot be combined with '{list}'"),
        ));
    }
    Ok(())
}

pub fn is_uuid4(value: &str) -> bool {
    UUID4_REGEX.is_match(value)
}

/// Validate options and serialize them into a request body
pub fn build_request_body<T: Validate + Serialize>(opts: &T) -> Result<JsonValue> {
    opts.validate()?;
    Ok(serde_json::to_value(opts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true ; "lowercase v4")]
    #[test_case("3FA85F64-5717-4562-B3FC-2C963F66AFA6", true ; "uppercase v4")]
    #[test_case("3fa85f64-5717-1562-b3fc-2c963f66afa6", false ; "version 1")]
    #[test_case("3fa85f64-5717-4562-73fc-2c963f66afa6", false ; "bad variant")]
    #[test_case("3fa85f6457174562b3fc2c963f66afa6", false ; "no hyphens")]
    #[test_case("", false ; "empty")]
    fn test_is_uuid4(value: &str, expected: bool) {
        assert_eq!(is_uuid4(value), expected);
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("name", "cluster").is_ok());

        let err = require_non_empty("name", "  ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for 'name': is required");
    }

    #[test]
    fn test_require_uuid4_all_names_position() {
        let ids = vec![
            "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string(),
            "volume-1".to_string(),
        ];
        let err = require_uuid4_all("volume_ids", &ids).unwrap_err();
        assert!(matches!(err, Error::Validation { ref field, .. } if field == "volume_ids[1]"));
    }

    #[test]
    fn test_require_exclusive() {
        let ids = vec!["x".to_string()];
        assert!(require_exclusive("all_volumes", true, "volume_ids", &[]).is_ok());
        assert!(require_exclusive("all_volumes", false, "volume_ids", &ids).is_ok());
        assert!(require_exclusive("all_volumes", true, "volume_ids", &ids).is_err());
    }

    struct Named(String);

    impl Validate for Named {
        fn validate(&self) -> Result<()> {
            require_non_empty("name", &self.0)
        }
    }

    impl Serialize for Named {
        fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
            s.serialize_str(&self.0)
        }
    }

    #[test]
    fn test_build_request_body() {
        let body = build_request_body(&Named("x".into())).unwrap();
        assert_eq!(body, serde_json::json!("x"));

        let err = build_request_body(&Named(String::new())).unwrap_err();
        assert_eq!(err.stage(), crate::error::Stage::Validation);
    }
}
