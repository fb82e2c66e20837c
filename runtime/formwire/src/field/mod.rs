//! The field tree that the mapping engine walks.
//!
//! A [`Field`] is one of three shapes:
//!
//! - a **leaf**, carrying a scalar value (no children);
//! - a **compound**, whose value is built out of its children;
//! - a **collection**, whose children (its _entries_) are all built out of the same
//!   template, the _prototype_.
//!
//! The shape is structural: a field with no children is treated as a leaf by the
//! serializer, whatever it was constructed as.
use serde_json::{Map, Value};

pub use options::{DEFAULT_XML_NAME, FieldOptions, InvalidFieldOptions};

mod options;

#[derive(Debug, Clone, PartialEq)]
/// A node in a form tree.
///
/// # Example
///
/// ```rust
/// use formwire::field::{Field, FieldOptions};
/// use serde_json::json;
///
/// let address = Field::compound("address")
///     .child(Field::leaf("street").with_options(FieldOptions::default().xml_attribute(true)))
///     .child(Field::leaf("city").with_options(FieldOptions::default().xml_attribute(true)));
/// let user = Field::compound("user")
///     .with_options(FieldOptions::default().xml_name("user"))
///     .child(Field::leaf("username").with_data(json!("jdoe")))
///     .child(Field::collection("addresses", address));
///
/// assert_eq!(
///     user.values(),
///     json!({ "username": "jdoe", "addresses": [] })
/// );
/// ```
pub struct Field {
    name: String,
    options: FieldOptions,
    children: Vec<Field>,
    prototype: Option<Box<Field>>,
    data: Value,
    errors: Vec<String>,
    submitted: bool,
}

impl Field {
    /// A field carrying a single scalar value.
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: FieldOptions::default(),
            children: Vec::new(),
            prototype: None,
            data: Value::Null,
            errors: Vec::new(),
            submitted: false,
        }
    }

    /// A field whose value is built out of its children.
    ///
    /// Add children using [`Field::child`].
    pub fn compound(name: impl Into<String>) -> Self {
        Self::leaf(name)
    }

    /// A homogeneous collection: every entry is a copy of `prototype`.
    ///
    /// Add entries using [`Field::entry`].
    pub fn collection(name: impl Into<String>, prototype: Field) -> Self {
        Self {
            prototype: Some(Box::new(prototype)),
            data: Value::Array(Vec::new()),
            ..Self::leaf(name)
        }
    }

    /// Replace the serialization options of this field.
    pub fn with_options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Append a child field.
    pub fn child(mut self, child: Field) -> Self {
        self.children.push(child);
        self
    }

    /// Append an entry to a collection.
    ///
    /// Entries are named after their position in the collection.
    pub fn entry(mut self, mut entry: Field) -> Self {
        entry.name = self.children.len().to_string();
        self.children.push(entry);
        self
    }

    /// Set the current value of a leaf.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Attach a validation error to this field.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    /// The internal identifier of this field, unique among its siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// The children of this field, in declaration order.
    ///
    /// For collections, these are the current entries.
    pub fn children(&self) -> &[Field] {
        &self.children
    }

    /// Look up a direct child by its internal name.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Look up a direct child by its internal name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// The children that should be rendered, i.e. all children
    /// except the ones marked as [`serialize_only`](FieldOptions::serialize_only).
    pub fn rendered_children(&self) -> impl Iterator<Item = &Field> {
        self.children.iter().filter(|c| !c.options.serialize_only)
    }

    /// The template for the entries of a collection.
    ///
    /// `None` if this field is not a collection.
    pub fn prototype(&self) -> Option<&Field> {
        self.prototype.as_deref()
    }

    pub fn is_collection(&self) -> bool {
        self.prototype.is_some()
    }

    /// The raw value held by this field.
    ///
    /// It's only meaningful for leaves (and empty collections): the value of a
    /// compound field is derived from its children, see [`Field::values`].
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Overwrite the raw value held by this field.
    pub fn set_data(&mut self, data: Value) {
        self.data = data;
    }

    /// The validation errors attached to this field (not to its children).
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// A field is valid if neither it nor any of its descendants carries errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.children.iter().all(Field::is_valid)
    }

    /// The current value of the tree rooted at this field, keyed by internal names.
    ///
    /// Disabled fields are skipped.
    pub fn values(&self) -> Value {
        if self.children.is_empty() {
            return self.data.clone();
        }
        let enabled = self.children.iter().filter(|c| !c.options.disabled);
        if self.is_collection() {
            Value::Array(enabled.map(Field::values).collect())
        } else {
            Value::Object(enabled.map(|c| (c.name.clone(), c.values())).collect())
        }
    }

    /// Assign a reconciled structure (e.g. the output of [`bind`](crate::tree::bind))
    /// to this tree.
    ///
    /// If `clear_missing` is `true`, children that don't appear in `data` are reset
    /// to `null`. PATCH requests should set it to `false`, to preserve the existing
    /// state of the fields that were not sent.
    ///
    /// Collections are resized to match the incoming entries: new entries are
    /// built out of the prototype. Disabled fields are never touched.
    pub fn submit(&mut self, data: &Value, clear_missing: bool) {
        self.submitted = true;
        if let Some(prototype) = &self.prototype {
            let items: Vec<(String, &Value)> = match data {
                Value::Null => Vec::new(),
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), item))
                    .collect(),
                Value::Object(items) => items.iter().map(|(k, v)| (k.clone(), v)).collect(),
                item => vec![("0".to_owned(), item)],
            };
            let mut previous = std::mem::take(&mut self.children);
            let mut entries = Vec::with_capacity(items.len());
            for (key, item) in items {
                let mut entry = match previous.iter().position(|e| e.name == key) {
                    Some(position) => previous.remove(position),
                    None => {
                        let mut entry = (**prototype).clone();
                        entry.name = key;
                        entry
                    }
                };
                entry.submit(item, clear_missing);
                entries.push(entry);
            }
            if !clear_missing {
                entries.extend(previous);
            }
            self.children = entries;
            return;
        }

        if self.children.is_empty() {
            self.data = data.clone();
            return;
        }

        let empty = Map::new();
        let mapping = data.as_object().unwrap_or(&empty);
        for child in self.children.iter_mut().filter(|c| !c.options.disabled) {
            match mapping.get(&child.name) {
                Some(value) => child.submit(value, clear_missing),
                None if clear_missing => child.submit(&Value::Null, clear_missing),
                None => {}
            }
        }
    }
}
