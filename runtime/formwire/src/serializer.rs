use std::sync::Arc;

use bytes::Bytes;
use serde_json::Value;

use crate::{
    config::SerializerOptions,
    encoder::{EncoderRegistry, errors::EncodeError, format},
    envelope::{ERROR_ROOT_NAME, RootEnvelope},
    field::{Field, FieldOptions},
    listener::BindRequestListener,
    tree,
};

/// The root name used by [`FormSerializer::serialize_list`] when the caller
/// doesn't provide one.
pub const DEFAULT_LIST_ROOT_NAME: &str = "entries";

#[derive(Debug, Clone)]
/// Serialize form trees, or their validation errors, into JSON or XML.
///
/// # Example
///
/// ```rust
/// use formwire::{FormSerializer, field::Field};
/// use serde_json::json;
///
/// let serializer = FormSerializer::default();
/// let form = Field::compound("user")
///     .child(Field::leaf("userName").with_data(json!("jdoe")));
/// let body = serializer.serialize(&form, "json")?;
/// assert_eq!(body, r#"{"user_name":"jdoe"}"#);
/// # Ok::<_, formwire::encoder::errors::EncodeError>(())
/// ```
pub struct FormSerializer {
    registry: Arc<EncoderRegistry>,
    options: Arc<SerializerOptions>,
}

impl Default for FormSerializer {
    fn default() -> Self {
        Self::new(
            Arc::new(EncoderRegistry::default()),
            Arc::new(SerializerOptions::default()),
        )
    }
}

impl FormSerializer {
    pub fn new(registry: Arc<EncoderRegistry>, options: Arc<SerializerOptions>) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &EncoderRegistry {
        &self.registry
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    /// A [`BindRequestListener`] sharing the codecs and the options of this serializer,
    /// so that whatever it serializes can be bound back.
    pub fn bind_request_listener(&self) -> BindRequestListener {
        BindRequestListener::new(self.registry.clone(), self.options.clone())
    }

    /// The data that [`serialize`](Self::serialize) would hand over to the codec
    /// for `format`, along with the name of the document element.
    ///
    /// A form that was submitted and failed validation is represented by its
    /// errors, under the [`ERROR_ROOT_NAME`] root.
    /// Any other form is represented by its values, under its own root name.
    pub fn representation(&self, form: &Field, format: &str) -> (Value, String) {
        let (data, declared_root) = if form.is_submitted() && !form.is_valid() {
            (tree::serialize_errors(form), ERROR_ROOT_NAME)
        } else {
            let data = tree::serialize(
                form,
                format == format::XML,
                self.options.naming_strategy(),
            );
            (data, form.options().serialize_xml_name.as_str())
        };
        let envelope = RootEnvelope::decide(format, declared_root, &self.options);
        (
            envelope.wrap_outbound(data),
            envelope.root_name().to_owned(),
        )
    }

    /// Serialize `form` into `format`.
    pub fn serialize(&self, form: &Field, format: &str) -> Result<Bytes, EncodeError> {
        let span = tracing::debug_span!(
            "Serialize form",
            form.name = form.name(),
            serialization.format = format,
        );
        let _guard = span.enter();
        let (data, root_name) = self.representation(form, format);
        self.registry.encode_with_root(&data, format, Some(&root_name))
    }

    /// Serialize a list of forms into `format`.
    ///
    /// The entries are wrapped into a synthetic root form, named `root_name`
    /// (or [`DEFAULT_LIST_ROOT_NAME`]), with a single collection child named
    /// `entry_name`. In XML, each entry becomes an `<entry_name>` element:
    ///
    /// ```xml
    /// <entries>
    ///   <user>...</user>
    ///   <user>...</user>
    /// </entries>
    /// ```
    pub fn serialize_list<I>(
        &self,
        entries: I,
        entry_name: &str,
        format: &str,
        root_name: Option<&str>,
    ) -> Result<Bytes, EncodeError>
    where
        I: IntoIterator<Item = Field>,
    {
        let root_name = root_name.unwrap_or(DEFAULT_LIST_ROOT_NAME);
        let mut entries = entries.into_iter().peekable();
        let prototype = entries
            .peek()
            .cloned()
            .unwrap_or_else(|| Field::leaf(entry_name));
        let collection = entries.fold(Field::collection(entry_name, prototype), Field::entry);
        let root = Field::compound(root_name)
            .with_options(FieldOptions::default().xml_name(root_name))
            .child(collection);
        self.serialize(&root, format)
    }
}
