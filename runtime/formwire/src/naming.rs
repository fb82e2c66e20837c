//! Derive the external name of a field from its internal identifier.
use heck::{ToLowerCamelCase, ToSnakeCase};

use crate::field::Field;

/// Computes the name a field is serialized under, when no explicit
/// [`serialize_name`](crate::field::FieldOptions::serialize_name) was provided.
///
/// Implementations must be pure: the same field always maps to the same name,
/// since the serializer and the binder resolve names independently.
pub trait NamingStrategy: std::fmt::Debug + Send + Sync {
    fn translate_name(&self, field: &Field) -> String;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// `zipCode` becomes `zip_code`.
pub struct SnakeCase;

impl NamingStrategy for SnakeCase {
    fn translate_name(&self, field: &Field) -> String {
        field.name().to_snake_case()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// `zip_code` becomes `zipCode`.
pub struct CamelCase;

impl NamingStrategy for CamelCase {
    fn translate_name(&self, field: &Field) -> String {
        field.name().to_lower_camel_case()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// The internal name is used as is.
pub struct Identity;

impl NamingStrategy for Identity {
    fn translate_name(&self, field: &Field) -> String {
        field.name().to_owned()
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
/// The built-in naming strategies, as they can be selected via configuration.
pub enum NamingConvention {
    /// See [`SnakeCase`].
    ///
    /// This is the default.
    #[default]
    SnakeCase,
    /// See [`CamelCase`].
    CamelCase,
    /// See [`Identity`].
    Identity,
}

impl NamingConvention {
    pub fn strategy(self) -> std::sync::Arc<dyn NamingStrategy> {
        match self {
            NamingConvention::SnakeCase => std::sync::Arc::new(SnakeCase),
            NamingConvention::CamelCase => std::sync::Arc::new(CamelCase),
            NamingConvention::Identity => std::sync::Arc::new(Identity),
        }
    }
}
