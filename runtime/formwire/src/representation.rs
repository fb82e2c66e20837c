//! The untyped tree that sits between the codecs and the mapping engine.
//!
//! Codecs decode bytes into a [`Value`] and encode a [`Value`] back into bytes;
//! the serializer and the binder never see the wire format.
//! Objects keep their insertion order, so the order of the fields in a form
//! is the order of the keys in the serialized output.
//!
//! XML-specific structure is encoded in the keys:
//!
//! - attributes are stored under their name prefixed with [`ATTRIBUTE_PREFIX`];
//! - the text content of an element that also has attributes or children is
//!   stored under [`TEXT_KEY`];
//! - repeated sibling elements are collapsed into an array.
pub use serde_json::{Map, Value};

/// The key holding the text content of an XML element.
pub const TEXT_KEY: &str = "#";

/// The prefix marking a key as an XML attribute.
pub const ATTRIBUTE_PREFIX: char = '@';

pub(crate) fn attribute_key(name: &str) -> String {
    format!("{ATTRIBUTE_PREFIX}{name}")
}

/// Returns `true` for values that a partial update treats as "not provided":
/// `null`, `false`, `0`, `""`, `"0"`, and empty arrays or objects.
///
/// This is deliberately loose: a PATCH request can't use it to clear a field
/// to an empty string or to `false`.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}
