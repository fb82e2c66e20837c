use serde_json::{Map, Value};

use crate::{field::Field, naming::NamingStrategy};

/// Convert a field tree into its serialized representation.
///
/// - A field without children is serialized as its raw value, unconverted.
/// - A collection is serialized as a sequence of its entries.
/// - A compound field is serialized as a mapping, one key per enabled child.
///
/// When `is_xml` is set, children may be mapped onto attributes (`@name`) or
/// onto the text content of the parent element (`#`), and non-inline children
/// are nested under an extra wrapper element named after their
/// [`serialize_xml_name`](crate::field::FieldOptions::serialize_xml_name).
pub fn serialize(field: &Field, is_xml: bool, naming: &dyn NamingStrategy) -> Value {
    if field.children().is_empty() {
        return field.data().clone();
    }
    let children = field.children().iter().filter(|c| !c.options().disabled);
    if field.is_collection() {
        return Value::Array(children.map(|e| serialize(e, is_xml, naming)).collect());
    }

    let mut result = Map::new();
    for child in children {
        let key = super::serialized_key(child, is_xml, naming);
        let value = serialize(child, is_xml, naming);
        let options = child.options();
        if is_xml && !options.serialize_xml_inline {
            let wrapper = result
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(wrapper) = wrapper {
                wrapper.insert(options.serialize_xml_name.clone(), value);
            }
        } else {
            result.insert(key, value);
        }
    }
    Value::Object(result)
}

/// Collect the validation errors of a field tree.
///
/// The output mirrors the tree: `{"error": [...], "children": {"name": {...}}}`.
/// Fields without errors are omitted, as is the `"error"` key for a field
/// whose errors all live in its descendants.
/// Children are keyed by their internal name.
pub fn serialize_errors(field: &Field) -> Value {
    let mut result = Map::new();
    if !field.errors().is_empty() {
        let messages = field.errors().iter().cloned().map(Value::String).collect();
        result.insert("error".to_owned(), Value::Array(messages));
    }

    let children: Map<String, Value> = field
        .children()
        .iter()
        .map(|child| (child.name().to_owned(), serialize_errors(child)))
        .filter(|(_, errors)| errors.as_object().is_some_and(|e| !e.is_empty()))
        .collect();
    if !children.is_empty() {
        result.insert("children".to_owned(), Value::Object(children));
    }
    Value::Object(result)
}
