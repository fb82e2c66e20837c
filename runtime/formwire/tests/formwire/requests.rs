use bytes::Bytes;
use formwire::{
    FormSerializer, SerializerOptions, SubmittedData,
    listener::{IncomingRequest, errors::BindRequestError},
};
use http::{HeaderMap, HeaderValue, Method, StatusCode, header::CONTENT_TYPE};
use serde_json::json;

use crate::fixtures::{as_str, filled_user_form, jdoe, listeners, serializer, user_form};

fn request(method: Method, content_type: &'static str, body: impl Into<Bytes>) -> SubmittedData {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    SubmittedData::Request(IncomingRequest::new(method, headers, body))
}

#[test]
fn what_is_serialized_can_be_submitted_back() {
    let serializer = FormSerializer::default();
    let listeners = listeners(&serializer);
    for (format, content_type) in [("json", "application/json"), ("xml", "application/xml")] {
        let body = serializer.serialize(&filled_user_form(), format).unwrap();

        let mut form = user_form();
        listeners
            .submit(&mut form, request(Method::POST, content_type, body.clone()))
            .unwrap();
        assert!(form.is_submitted());
        assert_eq!(form.values(), jdoe(), "{format}");
        assert_eq!(serializer.serialize(&form, format).unwrap(), body, "{format}");
    }
}

#[test]
fn json_root_is_unwrapped() {
    let serializer = serializer(SerializerOptions::default().with_include_root_in_json(true));
    let listeners = listeners(&serializer);

    let mut form = user_form();
    let body = r#"{"user": {"username": "jdoe", "address": {"zip_code": "12345"}}}"#;
    listeners
        .submit(&mut form, request(Method::PUT, "application/json", body))
        .unwrap();
    assert_eq!(form.values()["username"], "jdoe");
    assert_eq!(form.values()["address"]["zipCode"], "12345");

    // Without the root, nothing is bound.
    let mut form = filled_user_form();
    let body = r#"{"username": "jdoe"}"#;
    listeners
        .submit(&mut form, request(Method::PUT, "application/json", body))
        .unwrap();
    assert_eq!(form.values()["username"], json!(null));
}

#[test]
fn xml_application_root_is_unwrapped() {
    let serializer =
        serializer(SerializerOptions::default().with_application_xml_root_name("response"));
    let listeners = listeners(&serializer);

    let body = serializer.serialize(&filled_user_form(), "xml").unwrap();
    assert!(as_str(&body).contains("<response><user>"));

    let mut form = user_form();
    listeners
        .submit(&mut form, request(Method::POST, "text/xml; charset=utf-8", body))
        .unwrap();
    assert_eq!(form.values(), jdoe());
}

#[test]
fn patch_requests_keep_the_fields_that_were_not_sent() {
    let serializer = FormSerializer::default();
    let listeners = listeners(&serializer);

    let mut form = filled_user_form();
    let body = r#"<user><country>FR</country><address city="Paris"/></user>"#;
    listeners
        .submit(&mut form, request(Method::PATCH, "application/xml", body))
        .unwrap();

    let mut expected = jdoe();
    expected["country"] = json!("FR");
    expected["address"]["city"] = json!("Paris");
    assert_eq!(form.values(), expected);
}

#[test]
fn malformed_bodies_are_client_errors() {
    let serializer = FormSerializer::default();
    let listeners = listeners(&serializer);

    let mut form = user_form();
    let err = listeners
        .submit(
            &mut form,
            request(Method::POST, "application/xml", "<user><username>jdoe</user>"),
        )
        .unwrap_err();
    assert!(matches!(err, BindRequestError::Decode(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    assert!(!form.is_submitted());
}

#[test]
fn unsupported_content_types_are_rejected() {
    let serializer = FormSerializer::default();
    let listeners = listeners(&serializer);

    let mut form = user_form();
    let err = listeners
        .submit(
            &mut form,
            request(Method::POST, "application/x-www-form-urlencoded", "username=jdoe"),
        )
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[test]
fn data_bypasses_the_request_binder() {
    let serializer = FormSerializer::default();
    let listeners = listeners(&serializer);

    let mut form = user_form();
    listeners
        .submit(&mut form, SubmittedData::Data(jdoe()))
        .unwrap();
    assert_eq!(form.values(), jdoe());
}
