use formwire::{Field, FieldOptions, FormSerializer, SerializerOptions};
use serde_json::{Value, json};

use crate::fixtures::{as_str, filled_user_form, serializer, user_form};

#[test]
fn json_values() {
    let body = FormSerializer::default()
        .serialize(&filled_user_form(), "json")
        .unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "username": "jdoe",
            "email": "jdoe@example.com",
            "birthday": "1985-04-12",
            "country": "DE",
            "address": { "street": "Main St 1", "zip_code": "12345", "city": "Berlin" },
            "addresses": [
                { "street": "Elm St 2", "zip_code": "54321", "city": "Hamburg" },
                { "street": "Oak St 3", "zip_code": "67890", "city": "Munich" },
            ],
        })
    );
}

#[test]
fn xml_values() {
    let body = FormSerializer::default()
        .serialize(&filled_user_form(), "xml")
        .unwrap();
    assert_eq!(
        as_str(&body),
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "<user>",
            "<username>jdoe</username>",
            "<email>jdoe@example.com</email>",
            "<birthday>1985-04-12</birthday>",
            "<country>DE</country>",
            r#"<address street="Main St 1" zip_code="12345" city="Berlin"/>"#,
            "<addresses>",
            r#"<address street="Elm St 2" zip_code="54321" city="Hamburg"/>"#,
            r#"<address street="Oak St 3" zip_code="67890" city="Munich"/>"#,
            "</addresses>",
            "</user>",
        )
    );
}

#[test]
fn empty_form() {
    let serializer = FormSerializer::default();
    let body = serializer.serialize(&user_form(), "json").unwrap();
    assert_eq!(
        as_str(&body),
        r#"{"username":null,"email":null,"birthday":null,"country":null,"address":{"street":null,"zip_code":null,"city":null},"addresses":[]}"#
    );
    let body = serializer.serialize(&user_form(), "xml").unwrap();
    assert_eq!(
        as_str(&body),
        r#"<?xml version="1.0" encoding="UTF-8"?><user><username/><email/><birthday/><country/><address/><addresses></addresses></user>"#
    );
}

#[test]
fn root_is_included_in_json_on_demand() {
    let serializer = serializer(SerializerOptions::default().with_include_root_in_json(true));
    let body = serializer.serialize(&filled_user_form(), "json").unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["user"]["username"], "jdoe");
    assert_eq!(body.as_object().map(|o| o.len()), Some(1));
}

#[test]
fn application_xml_root() {
    let serializer =
        serializer(SerializerOptions::default().with_application_xml_root_name("response"));
    let body = serializer.serialize(&filled_user_form(), "xml").unwrap();
    let body = as_str(&body);
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><response><user><username>jdoe</username>"#));
    assert!(body.ends_with("</user></response>"));
}

#[test]
fn validation_errors() {
    let serializer = FormSerializer::default();
    let mut form = filled_user_form();
    form.add_error("This form should not contain extra fields.");
    if let Some(email) = form.get_mut("email") {
        email.add_error("This value is not a valid email address.");
    }
    if let Some(city) = form.get_mut("address").and_then(|a| a.get_mut("city")) {
        city.add_error("This value should not be blank.");
    }

    let body = serializer.serialize(&form, "json").unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "error": ["This form should not contain extra fields."],
            "children": {
                "email": { "error": ["This value is not a valid email address."] },
                "address": { "children": { "city": { "error": ["This value should not be blank."] } } },
            },
        })
    );

    let body = serializer.serialize(&form, "xml").unwrap();
    assert_eq!(
        as_str(&body),
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "<form>",
            "<error>This form should not contain extra fields.</error>",
            "<children>",
            "<email><error>This value is not a valid email address.</error></email>",
            "<address><children><city><error>This value should not be blank.</error></city></children></address>",
            "</children>",
            "</form>",
        )
    );
}

#[test]
fn error_payloads_follow_the_root_policy() {
    let serializer = serializer(
        SerializerOptions::default()
            .with_include_root_in_json(true)
            .with_application_xml_root_name("response"),
    );
    let mut form = filled_user_form();
    form.add_error("Invalid");

    let body = serializer.serialize(&form, "json").unwrap();
    assert_eq!(as_str(&body), r#"{"form":{"error":["Invalid"]}}"#);
    let body = serializer.serialize(&form, "xml").unwrap();
    assert_eq!(
        as_str(&body),
        r#"<?xml version="1.0" encoding="UTF-8"?><response><form><error>Invalid</error></form></response>"#
    );
}

#[test]
fn serialization_only_fields_are_serialized_but_not_rendered() {
    let form = Field::compound("user")
        .child(Field::leaf("username").with_data(json!("jdoe")))
        .child(
            Field::leaf("createdAt")
                .with_options(FieldOptions::default().serialize_only(true))
                .with_data(json!("2024-01-01")),
        );
    let rendered: Vec<_> = form.rendered_children().map(Field::name).collect();
    assert_eq!(rendered, ["username"]);

    let body = FormSerializer::default().serialize(&form, "json").unwrap();
    assert_eq!(
        as_str(&body),
        r#"{"username":"jdoe","created_at":"2024-01-01"}"#
    );
}

#[test]
fn camel_case_naming() {
    let config: formwire::SerializerConfig =
        serde_json::from_value(json!({ "naming_strategy": "camel_case" })).unwrap();
    let serializer = serializer(config.into());
    let body = serializer.serialize(&filled_user_form(), "json").unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["address"]["zipCode"], "12345");
}

#[test]
fn lists_of_forms() {
    let body = FormSerializer::default()
        .serialize_list(
            [filled_user_form(), filled_user_form()],
            "user",
            "xml",
            None,
        )
        .unwrap();
    let body = as_str(&body);
    assert!(body.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><entries><user><username>jdoe</username>"#));
    assert_eq!(body.matches("<user>").count(), 2);
    assert!(body.ends_with("</user></entries>"));
}
