//! Tagged-union codec
//!
//! Some resources embed objects that take one of a closed set of shapes,
//! selected by a discriminator field inside the object itself. Decoding peeks
//! at the discriminator first (every other value is skipped, not built), checks
//! it against the known tags and only then decodes the one matching shape.
//! Encoding writes the populated shape as-is; the discriminator is one of its
//! own fields.
//!
//! A union opts in by implementing [`TaggedUnion`]; its `Serialize` and
//! `Deserialize` impls then delegate to [`encode_value`] and [`decode_value`].

mod interface;

pub use interface::{
    AnySubnetInterface, ExternalInterface, FloatingIp, FloatingIpSource, InterfaceConfig,
    IpFamily, SubnetInterface,
};

use crate::error::{Error, Result};
use crate::extract::kind_of;
use crate::types::JsonValue;
use serde::de::{DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use std::fmt;

// ============================================================================
// TaggedUnion
// ============================================================================

/// A closed set of JSON shapes told apart by a discriminator field
pub trait TaggedUnion: Sized {
    /// Name used in error messages
    const NAME: &'static str;

    /// Field carrying the discriminator
    const DISCRIMINATOR: &'static str;

    /// Every accepted discriminator value
    const TAGS: &'static [&'static str];

    /// Tag of the populated variant
    fn tag(&self) -> &'static str;

    /// Discriminator as stored in the populated shape itself
    fn shape_tag(&self) -> &str;

    /// Decode the shape selected by `tag`. Only called with a member of `TAGS`.
    fn decode_shape<'de, D>(tag: &str, deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>;

    /// Encode the populated shape
    fn encode_shape(&self) -> serde_json::Result<JsonValue>;
}

// ============================================================================
// Decode
// ============================================================================

/// Decode a union from raw JSON bytes
pub fn decode<U: TaggedUnion>(bytes: &[u8]) -> Result<U> {
    let discriminator = peek_discriminator(bytes, U::DISCRIMINATOR)
        .map_err(|e| Error::decode(U::NAME, e.to_string()))?;
    let tag = check_tag::<U>(discriminator)?;

    let mut de = serde_json::Deserializer::from_slice(bytes);
    let union = U::decode_shape(tag, &mut de).map_err(|e| Error::decode(U::NAME, e.to_string()))?;
    de.end().map_err(|e| Error::decode(U::NAME, e.to_string()))?;
    Ok(union)
}

/// Decode a union from an already parsed JSON value
pub fn decode_value<U: TaggedUnion>(value: JsonValue) -> Result<U> {
    let discriminator = match &value {
        JsonValue::Object(fields) => fields.get(U::DISCRIMINATOR).cloned(),
        other => {
            return Err(Error::decode(
                U::NAME,
                format!("expected a JSON object, found {}", kind_of(other)),
            ))
        }
    };
    let tag = check_tag::<U>(discriminator)?;
    U::decode_shape(tag, value).map_err(|e| Error::decode(U::NAME, e.to_string()))
}

/// Read only the discriminator of a JSON object, skipping every other value
pub fn peek_discriminator(bytes: &[u8], field: &str) -> serde_json::Result<Option<JsonValue>> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let found = DiscriminatorPeek { field }.deserialize(&mut de)?;
    de.end()?;
    Ok(found)
}

/// Resolve a discriminator value against the union's closed tag set
fn check_tag<U: TaggedUnion>(discriminator: Option<JsonValue>) -> Result<&'static str> {
    let value = match discriminator {
        None | Some(JsonValue::Null) => {
            return Err(Error::MissingDiscriminator {
                field: U::DISCRIMINATOR.to_string(),
                target: U::NAME.to_string(),
            })
        }
        Some(value) => value,
    };

    let literal = match value {
        JsonValue::String(s) => s,
        other => other.to_string(),
    };
    U::TAGS
        .iter()
        .copied()
        .find(|tag| *tag == literal)
        .ok_or_else(|| Error::UnknownDiscriminator {
            field: U::DISCRIMINATOR.to_string(),
            target: U::NAME.to_string(),
            value: literal,
        })
}

struct DiscriminatorPeek<'a> {
    field: &'a str,
}

impl<'de> DeserializeSeed<'de> for DiscriminatorPeek<'_> {
    type Value = Option<JsonValue>;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for DiscriminatorPeek<'_> {
    type Value = Option<JsonValue>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a JSON object with a '{}' field", self.field)
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        while let Some(key) = map.next_key::<String>()? {
            if found.is_none() && key == self.field {
                found = Some(map.next_value::<JsonValue>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(found)
    }
}

// ============================================================================
// Encode
// ============================================================================

/// Encode the populated shape of a union to JSON bytes
pub fn encode<U: TaggedUnion>(union: &U) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&encode_value(union)?)?)
}

/// Encode the populated shape of a union to a JSON value.
///
/// Fails when the shape's own discriminator disagrees with the variant it is
/// stored in, or when the encoded object does not carry the discriminator.
pub fn encode_value<U: TaggedUnion>(union: &U) -> Result<JsonValue> {
    let tag = union.tag();
    if union.shape_tag() != tag {
        return Err(Error::invariant(
            U::NAME,
            format!(
                "{} variant holds a shape whose {} is '{}'",
                tag,
                U::DISCRIMINATOR,
                union.shape_tag()
            ),
        ));
    }

    let value = union.encode_shape()?;
    match value.get(U::DISCRIMINATOR) {
        Some(JsonValue::String(s)) if s == tag => Ok(value),
        _ => Err(Error::invariant(
            U::NAME,
            format!("encoded {tag} shape does not carry its {}", U::DISCRIMINATOR),
        )),
    }
}

/// Tag of the populated variant, or `""` when there is none
pub fn discriminator_of<U: TaggedUnion>(union: Option<&U>) -> &'static str {
    union.map_or("", U::tag)
}
