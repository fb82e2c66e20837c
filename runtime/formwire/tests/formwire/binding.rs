use formwire::{
    EncoderRegistry, Field, FieldOptions, FormSerializer, naming::SnakeCase, tree::bind,
};
use serde_json::json;

use crate::fixtures::{filled_user_form, jdoe, user_form};

/// Serialize the filled form, decode the payload, bind it to a fresh form.
fn round_trip(form: &Field, format: &str) -> Field {
    let serializer = FormSerializer::default();
    let body = serializer.serialize(form, format).unwrap();
    let decoded = EncoderRegistry::default().decode(&body, format).unwrap();
    let bound = bind(&decoded, &user_form(), format == "xml", false, &SnakeCase);
    let mut fresh = user_form();
    fresh.submit(&bound, true);
    fresh
}

#[test]
fn json_round_trip() {
    let form = round_trip(&filled_user_form(), "json");
    assert_eq!(form.values(), jdoe());
}

#[test]
fn xml_round_trip() {
    let form = round_trip(&filled_user_form(), "xml");
    assert_eq!(form.values(), jdoe());
}

#[test]
fn a_single_collection_entry_survives_an_xml_round_trip() {
    let mut data = jdoe();
    data["addresses"] = json!([{ "street": "Elm St 2", "zipCode": "54321", "city": "Hamburg" }]);
    let mut form = user_form();
    form.submit(&data, true);

    let form = round_trip(&form, "xml");
    assert_eq!(form.values(), data);
}

#[test]
fn an_empty_collection_survives_a_round_trip() {
    let mut data = jdoe();
    data["addresses"] = json!([]);
    let mut form = user_form();
    form.submit(&data, true);

    for format in ["json", "xml"] {
        let form = round_trip(&form, format);
        assert_eq!(form.values(), data, "{format}");
    }
}

#[test]
fn patch_only_touches_the_provided_fields() {
    let data = json!({ "email": "john@example.com", "address": { "city": "Potsdam" } });
    let bound = bind(&data, &user_form(), false, true, &SnakeCase);
    assert_eq!(
        bound,
        json!({ "email": "john@example.com", "address": { "city": "Potsdam" } })
    );

    let mut form = filled_user_form();
    form.submit(&bound, false);
    let mut expected = jdoe();
    expected["email"] = json!("john@example.com");
    expected["address"]["city"] = json!("Potsdam");
    assert_eq!(form.values(), expected);
}

#[test]
fn patch_cannot_clear_a_field() {
    // Falsy values are indistinguishable from missing ones.
    let data = json!({ "username": "", "country": "0", "email": null });
    let bound = bind(&data, &user_form(), false, true, &SnakeCase);
    assert_eq!(bound, json!({}));
}

#[test]
fn full_updates_reset_the_missing_fields() {
    let bound = bind(&json!({ "username": "jdoe" }), &user_form(), false, false, &SnakeCase);
    let mut form = filled_user_form();
    form.submit(&bound, true);
    assert_eq!(
        form.values(),
        json!({
            "username": "jdoe",
            "email": null,
            "birthday": null,
            "country": null,
            "address": { "street": null, "zipCode": null, "city": null },
            "addresses": [],
        })
    );
}

#[test]
fn xml_attributes_round_trip() {
    let decoded = EncoderRegistry::default()
        .decode(
            br#"<user><address street="Main St 1" zip_code="12345" city="Berlin"/></user>"#,
            "xml",
        )
        .unwrap();
    let bound = bind(&decoded, &user_form(), true, true, &SnakeCase);
    assert_eq!(
        bound,
        json!({ "address": { "street": "Main St 1", "zipCode": "12345", "city": "Berlin" } })
    );
}

#[test]
fn text_values_take_precedence() {
    let price = Field::compound("price")
        .child(Field::leaf("currency").with_options(FieldOptions::default().xml_attribute(true)))
        .child(Field::leaf("amount").with_options(FieldOptions::default().xml_value(true)));
    let form = Field::compound("product").child(price);

    let decoded = EncoderRegistry::default()
        .decode(br#"<product><price currency="EUR">10.50</price></product>"#, "xml")
        .unwrap();
    let bound = bind(&decoded, &form, true, false, &SnakeCase);
    assert_eq!(bound, json!({ "price": { "currency": "EUR", "amount": "10.50" } }));
}

#[test]
fn text_only_elements_survive_an_xml_round_trip() {
    let price = Field::compound("price")
        .child(Field::leaf("currency").with_options(FieldOptions::default().xml_attribute(true)))
        .child(
            Field::leaf("amount")
                .with_options(FieldOptions::default().xml_value(true))
                .with_data(json!("10.50")),
        );
    let form = Field::compound("product")
        .with_options(FieldOptions::default().xml_name("product"))
        .child(price);

    let body = FormSerializer::default().serialize(&form, "xml").unwrap();
    assert!(body.ends_with(b"<product><price>10.50</price></product>"));

    let decoded = EncoderRegistry::default().decode(&body, "xml").unwrap();
    let bound = bind(&decoded, &form, true, false, &SnakeCase);
    assert_eq!(bound, json!({ "price": { "currency": null, "amount": "10.50" } }));
}

#[test]
fn disabled_fields_are_never_bound() {
    let form = user_form().child(
        Field::leaf("id").with_options(FieldOptions::default().disabled(true)),
    );
    let mut data = jdoe();
    data["id"] = json!(42);
    for is_xml in [true, false] {
        let bound = bind(&data, &form, is_xml, false, &SnakeCase);
        assert!(bound.get("id").is_none());
    }
}
