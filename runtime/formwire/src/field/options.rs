use serde_json::Value;

/// The element name used for wrapped collections and list entries when
/// nothing else was configured.
pub const DEFAULT_XML_NAME: &str = "entry";

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "snake_case")]
#[non_exhaustive]
/// Per-field presentation rules, resolved once when the field tree is built.
///
/// The same options drive both directions: the [serializer](crate::tree::serialize)
/// uses them to decide where a field's value ends up, the [binder](crate::tree::bind)
/// uses them to find it again.
///
/// # Example
///
/// ```rust
/// use formwire::field::FieldOptions;
///
/// // An address that is serialized as a wrapped list of `<address>` elements in XML.
/// let options = FieldOptions::default().xml_inline(false).xml_name("address");
/// assert!(!options.serialize_xml_inline);
/// assert_eq!(options.serialize_xml_name, "address");
/// ```
pub struct FieldOptions {
    /// Overrides the external name of the field.
    ///
    /// If `None`, the external name is computed by the configured
    /// [`NamingStrategy`](crate::naming::NamingStrategy).
    /// Option bags may also unset it with `false`.
    #[serde(deserialize_with = "name_or_false")]
    pub serialize_name: Option<String>,
    /// The name of the wrapper element for non-inline collections.
    ///
    /// On the root field, it's the declared root name of the whole tree.
    ///
    /// # Default
    ///
    /// `"entry"`.
    pub serialize_xml_name: String,
    /// Map the field onto the text content of its parent element (XML only).
    pub serialize_xml_value: bool,
    /// Map the field onto an attribute of its parent element (XML only).
    pub serialize_xml_attribute: bool,
    /// If `false`, the field is nested one level deeper, under an element
    /// named after [`serialize_xml_name`](Self::serialize_xml_name) (XML only).
    ///
    /// # Default
    ///
    /// `true`.
    pub serialize_xml_inline: bool,
    /// The field is used for serialization but hidden from the rendering view.
    pub serialize_only: bool,
    /// Disabled fields are neither serialized nor bound.
    pub disabled: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            serialize_name: None,
            serialize_xml_name: DEFAULT_XML_NAME.to_owned(),
            serialize_xml_value: false,
            serialize_xml_attribute: false,
            serialize_xml_inline: true,
            serialize_only: false,
            disabled: false,
        }
    }
}

impl FieldOptions {
    /// Resolve a loosely-typed option bag into a [`FieldOptions`] record.
    ///
    /// Unknown keys are ignored: they belong to the form framework
    /// (widgets, constraints, etc.), not to the serializer.
    /// Missing keys take their default value.
    pub fn resolve(options: &Value) -> Result<Self, InvalidFieldOptions> {
        Self::deserialize_from(options).map_err(|source| InvalidFieldOptions { source })
    }

    fn deserialize_from(options: &Value) -> Result<Self, serde_json::Error> {
        match options {
            Value::Null => Ok(Self::default()),
            options => serde::Deserialize::deserialize(options),
        }
    }

    /// Set [`serialize_name`](Self::serialize_name).
    pub fn serialize_name(mut self, name: impl Into<String>) -> Self {
        self.serialize_name = Some(name.into());
        self
    }

    /// Set [`serialize_xml_name`](Self::serialize_xml_name).
    pub fn xml_name(mut self, name: impl Into<String>) -> Self {
        self.serialize_xml_name = name.into();
        self
    }

    /// Set [`serialize_xml_value`](Self::serialize_xml_value).
    pub fn xml_value(mut self, enabled: bool) -> Self {
        self.serialize_xml_value = enabled;
        self
    }

    /// Set [`serialize_xml_attribute`](Self::serialize_xml_attribute).
    pub fn xml_attribute(mut self, enabled: bool) -> Self {
        self.serialize_xml_attribute = enabled;
        self
    }

    /// Set [`serialize_xml_inline`](Self::serialize_xml_inline).
    pub fn xml_inline(mut self, inline: bool) -> Self {
        self.serialize_xml_inline = inline;
        self
    }

    /// Set [`serialize_only`](Self::serialize_only).
    pub fn serialize_only(mut self, enabled: bool) -> Self {
        self.serialize_only = enabled;
        self
    }

    /// Set [`disabled`](Self::disabled).
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

fn name_or_false<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Name {
        Set(String),
        Unset(bool),
    }

    match <Option<Name> as serde::Deserialize>::deserialize(deserializer)? {
        Some(Name::Set(name)) => Ok(Some(name)),
        Some(Name::Unset(false)) | None => Ok(None),
        Some(Name::Unset(true)) => Err(serde::de::Error::custom(
            "`serialize_name` must be a string or `false`",
        )),
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid serialization options for a form field.\n{source}")]
#[non_exhaustive]
/// The error returned by [`FieldOptions::resolve`] when one of the known
/// options has the wrong type.
pub struct InvalidFieldOptions {
    #[source]
    source: serde_json::Error,
}
