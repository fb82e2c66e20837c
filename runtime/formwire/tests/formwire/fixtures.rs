use std::sync::Arc;

use formwire::{
    EncoderRegistry, Field, FieldOptions, FormSerializer, PreSubmitListeners, SerializerOptions,
};
use serde_json::{Value, json};

/// A postal address, with every field mapped onto an XML attribute.
pub fn address_form() -> Field {
    let attribute = FieldOptions::default().xml_attribute(true);
    Field::compound("address")
        .child(Field::leaf("street").with_options(attribute.clone()))
        .child(Field::leaf("zipCode").with_options(attribute.clone()))
        .child(Field::leaf("city").with_options(attribute))
}

/// A user, with a main address and a list of secondary ones.
///
/// In XML, the secondary addresses are wrapped in an `<addresses>` element.
pub fn user_form() -> Field {
    Field::compound("user")
        .with_options(FieldOptions::default().xml_name("user"))
        .child(Field::leaf("username"))
        .child(Field::leaf("email"))
        .child(Field::leaf("birthday"))
        .child(Field::leaf("country"))
        .child(address_form())
        .child(
            Field::collection("addresses", address_form())
                .with_options(FieldOptions::default().xml_inline(false).xml_name("address")),
        )
}

/// The values of a fully populated [`user_form`], keyed by internal names.
pub fn jdoe() -> Value {
    json!({
        "username": "jdoe",
        "email": "jdoe@example.com",
        "birthday": "1985-04-12",
        "country": "DE",
        "address": { "street": "Main St 1", "zipCode": "12345", "city": "Berlin" },
        "addresses": [
            { "street": "Elm St 2", "zipCode": "54321", "city": "Hamburg" },
            { "street": "Oak St 3", "zipCode": "67890", "city": "Munich" },
        ],
    })
}

pub fn filled_user_form() -> Field {
    let mut form = user_form();
    form.submit(&jdoe(), true);
    form
}

pub fn serializer(options: SerializerOptions) -> FormSerializer {
    FormSerializer::new(Arc::new(EncoderRegistry::default()), Arc::new(options))
}

/// A listener chain with the request binder registered.
pub fn listeners(serializer: &FormSerializer) -> PreSubmitListeners {
    let mut listeners = PreSubmitListeners::new();
    listeners.register(serializer.bind_request_listener());
    listeners
}

pub fn as_str(bytes: &[u8]) -> &str {
    std::str::from_utf8(bytes).expect("The payload is not valid UTF-8")
}
