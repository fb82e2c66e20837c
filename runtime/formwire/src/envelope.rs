//! Decide whether a payload is nested under a root key, in both directions.
use serde_json::{Map, Value};

use crate::{
    config::SerializerOptions,
    encoder::format,
    field::{DEFAULT_XML_NAME, Field},
};

/// The root name used for validation error payloads, regardless of the
/// root name declared by the form.
pub const ERROR_ROOT_NAME: &str = "form";

#[derive(Debug, Clone, PartialEq, Eq)]
/// How the root of a payload is handled for a given format and configuration.
///
/// - In JSON, the payload is nested under the declared root name if
///   [`include_root_in_json`](SerializerOptions::include_root_in_json) is set.
/// - In XML, the payload is nested under the declared root name if an
///   [application-wide root element](SerializerOptions::application_xml_root_name)
///   is configured and it differs from the declared one. The application root
///   then becomes the document element.
pub struct RootEnvelope {
    wrapper_key: Option<String>,
    root_name: String,
}

impl RootEnvelope {
    pub fn decide(format: &str, declared_root: &str, options: &SerializerOptions) -> Self {
        let declared_root = if declared_root.is_empty() {
            DEFAULT_XML_NAME
        } else {
            declared_root
        };
        let unwrapped = Self {
            wrapper_key: None,
            root_name: declared_root.to_owned(),
        };
        match format {
            format::JSON if options.include_root_in_json() => Self {
                wrapper_key: Some(declared_root.to_owned()),
                ..unwrapped
            },
            format::XML => match options.application_xml_root_name() {
                Some(application_root) if application_root != declared_root => Self {
                    wrapper_key: Some(declared_root.to_owned()),
                    root_name: application_root.to_owned(),
                },
                _ => unwrapped,
            },
            _ => unwrapped,
        }
    }

    /// Shorthand for [`decide`](Self::decide), using the root name declared
    /// by `form`.
    pub fn for_form(form: &Field, format: &str, options: &SerializerOptions) -> Self {
        Self::decide(format, &form.options().serialize_xml_name, options)
    }

    /// The key the payload is nested under, if any.
    pub fn wrapper_key(&self) -> Option<&str> {
        self.wrapper_key.as_deref()
    }

    /// The name of the document element, for formats that have one.
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Extract the payload from a decoded request body.
    ///
    /// If the wrapper key is expected but missing, the payload is an empty mapping.
    pub fn unwrap_inbound(&self, data: Value) -> Value {
        let Some(key) = &self.wrapper_key else {
            return data;
        };
        match data {
            Value::Object(mut mapping) => mapping
                .remove(key)
                .filter(|v| !v.is_null())
                .unwrap_or_else(|| Value::Object(Map::new())),
            _ => Value::Object(Map::new()),
        }
    }

    pub fn wrap_outbound(&self, data: Value) -> Value {
        match &self.wrapper_key {
            Some(key) => {
                let mut wrapper = Map::new();
                wrapper.insert(key.clone(), data);
                Value::Object(wrapper)
            }
            None => data,
        }
    }
}
