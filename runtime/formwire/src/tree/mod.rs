//! The structural mapping engine.
//!
//! [`serialize`] turns a field tree into a [`Value`](crate::representation::Value),
//! [`bind`] walks the same tree to pull the values of each field out of a
//! decoded request body.
//! Both directions share the same naming rules, so that whatever [`serialize`]
//! emits, [`bind`] can read back.
pub use bind::bind;
pub use serialize::{serialize, serialize_errors};

mod bind;
mod serialize;

use crate::{field::Field, naming::NamingStrategy, representation};

/// The external name of a field: its explicit override, if any,
/// or the output of the naming strategy.
pub(crate) fn external_name(field: &Field, naming: &dyn NamingStrategy) -> String {
    match &field.options().serialize_name {
        Some(name) => name.clone(),
        None => naming.translate_name(field),
    }
}

/// The key a field is serialized under, in its parent's mapping.
///
/// For XML, text-value fields map onto the text node and attribute fields
/// onto a prefixed key.
pub(crate) fn serialized_key(field: &Field, is_xml: bool, naming: &dyn NamingStrategy) -> String {
    let name = external_name(field, naming);
    if !is_xml {
        return name;
    }
    let options = field.options();
    if options.serialize_xml_value {
        representation::TEXT_KEY.to_owned()
    } else if options.serialize_xml_attribute {
        representation::attribute_key(&name)
    } else {
        name
    }
}
