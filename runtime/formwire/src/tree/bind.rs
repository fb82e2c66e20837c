use serde_json::{Map, Value};

use crate::{
    field::{Field, FieldOptions},
    naming::NamingStrategy,
    representation::{self, TEXT_KEY},
};

static NULL: Value = Value::Null;

/// Walk `field` and `data` side by side, pulling the raw value of every field
/// out of the decoded request body.
///
/// The output is keyed by internal field names and can be handed over to
/// [`Field::submit`].
///
/// # Name resolution
///
/// For every enabled child, the raw value is looked up as follows:
///
/// 1. text-value fields read `data["#"]`, if present;
/// 2. non-inline fields, in XML, read `data[name][wrapper_name]`;
/// 3. everything else reads `data["@name"]`, falling back to `data[name]`.
///
/// Missing values are bound as `null`.
///
/// In XML, a scalar bound to a compound field with a text-value child is read
/// as the text content of the element, as if it were `{"#": scalar}`.
///
/// # Partial updates
///
/// If `is_patch` is set, children whose bound value is
/// [blank](representation::is_blank) are left out of the output, to avoid
/// clobbering the existing state of the form.
///
/// # Collections
///
/// The entries of a collection are bound against its prototype.
/// A single mapping is treated as a collection with one entry: an XML
/// decoder can't tell a one-element list apart from a single element.
pub fn bind(
    data: &Value,
    field: &Field,
    is_xml: bool,
    is_patch: bool,
    naming: &dyn NamingStrategy,
) -> Value {
    if let Some(prototype) = field.prototype() {
        return bind_collection(data, prototype, is_xml, is_patch, naming);
    }
    if field.children().is_empty() {
        return data.clone();
    }

    let text_only;
    let mapping = match data {
        Value::Object(mapping) => Some(mapping),
        Value::Null => None,
        // An element carrying nothing but its text content decodes to a scalar.
        text @ (Value::String(_) | Value::Number(_) | Value::Bool(_))
            if is_xml && has_text_value(field) =>
        {
            text_only = Map::from_iter([(TEXT_KEY.to_owned(), text.clone())]);
            Some(&text_only)
        }
        _ => {
            tracing::debug!(
                form.field = field.name(),
                "Expected a mapping for a compound field, binding `null` to all its children"
            );
            None
        }
    };

    let mut result = Map::new();
    for child in field.children().iter().filter(|c| !c.options().disabled) {
        let name = super::external_name(child, naming);
        let raw = mapping
            .and_then(|m| resolve_raw(m, &name, child.options(), is_xml))
            .unwrap_or(&NULL);
        let bound = bind(raw, child, is_xml, is_patch, naming);
        if is_patch && representation::is_blank(&bound) {
            continue;
        }
        result.insert(child.name().to_owned(), bound);
    }
    Value::Object(result)
}

fn bind_collection(
    data: &Value,
    prototype: &Field,
    is_xml: bool,
    is_patch: bool,
    naming: &dyn NamingStrategy,
) -> Value {
    match data {
        Value::Null => Value::Array(Vec::new()),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| bind(item, prototype, is_xml, is_patch, naming))
                .collect(),
        ),
        // A mapping keyed by position.
        Value::Object(items) if items.contains_key("0") => Value::Object(
            items
                .iter()
                .map(|(key, item)| (key.clone(), bind(item, prototype, is_xml, is_patch, naming)))
                .collect(),
        ),
        item => Value::Array(vec![bind(item, prototype, is_xml, is_patch, naming)]),
    }
}

fn has_text_value(field: &Field) -> bool {
    field
        .children()
        .iter()
        .any(|c| !c.options().disabled && c.options().serialize_xml_value)
}

/// Find the raw value for a child field in its parent's mapping.
///
/// `null` entries are treated as missing.
fn resolve_raw<'a>(
    data: &'a Map<String, Value>,
    name: &str,
    options: &FieldOptions,
    is_xml: bool,
) -> Option<&'a Value> {
    let present = |value: &&Value| !value.is_null();
    if options.serialize_xml_value {
        if let Some(text) = data.get(TEXT_KEY).filter(present) {
            return Some(text);
        }
    }
    if is_xml && !options.serialize_xml_inline {
        return data
            .get(name)
            .and_then(|wrapper| wrapper.get(&options.serialize_xml_name))
            .filter(present);
    }
    data.get(&representation::attribute_key(name))
        .filter(present)
        .or_else(|| data.get(name).filter(present))
}
