use std::borrow::Cow;

use anyhow::Context;
use bytes::Bytes;
use indexmap::{IndexMap, map::Entry};
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use serde_json::{Map, Value};

use super::{Codec, format};
use crate::representation::{ATTRIBUTE_PREFIX, TEXT_KEY, attribute_key};

/// The document element used when the caller doesn't provide one.
pub const DEFAULT_ROOT_NAME: &str = "response";

/// The element used for sequence items and for keys that aren't valid
/// element names.
const ITEM_ELEMENT: &str = "item";

#[derive(Debug, Clone)]
/// The XML codec, built on top of `quick-xml`.
///
/// # Mapping
///
/// - The document element is not part of the representation: its content is.
/// - Attributes are stored under `@name`.
/// - Text content is stored under `#` if the element has attributes or
///   children, as a plain string otherwise.
/// - Repeated sibling elements are collapsed into an array.
/// - An element without attributes, children or text decodes to `null`.
///
/// All scalars decode as strings. When encoding, booleans are written as
/// `1` and `0`, and sequence items or keys that aren't valid element names
/// are written as `<item key="...">`.
pub struct XmlCodec {
    default_root_name: String,
}

impl Default for XmlCodec {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

impl XmlCodec {
    /// Use `default_root_name` as the document element when encoding,
    /// unless the caller provides one.
    pub fn new(default_root_name: impl Into<String>) -> Self {
        Self {
            default_root_name: default_root_name.into(),
        }
    }

    pub fn default_root_name(&self) -> &str {
        &self.default_root_name
    }
}

impl Codec for XmlCodec {
    fn formats(&self) -> &'static [&'static str] {
        &[format::XML]
    }

    fn encode(&self, data: &Value, root_name: Option<&str>) -> Result<Bytes, anyhow::Error> {
        let root_name = root_name.unwrap_or(&self.default_root_name);
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_element(&mut writer, root_name, None, data)?;
        Ok(writer.into_inner().into())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, anyhow::Error> {
        let document = std::str::from_utf8(bytes).context("The payload is not valid UTF-8")?;
        if document.trim().is_empty() {
            return Ok(Value::Null);
        }

        let mut reader = Reader::from_str(document);
        reader.config_mut().trim_text(true);
        let mut stack: Vec<Frame> = Vec::new();
        let mut root = None;
        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Frame::open(&start)?),
                Event::Empty(start) => {
                    let frame = Frame::open(&start)?;
                    close(&mut stack, &mut root, frame)?;
                }
                Event::End(_) => {
                    let frame = stack.pop().context("Found a closing tag without an opening one")?;
                    close(&mut stack, &mut root, frame)?;
                }
                Event::Text(text) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.text.push_str(std::str::from_utf8(&data)?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(frame) = stack.last() {
            anyhow::bail!("The document ended before `<{}>` was closed", frame.name);
        }
        root.context("The document has no root element")
    }
}

/// An element whose closing tag hasn't been reached yet.
struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: IndexMap<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart) -> Result<Self, anyhow::Error> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = std::str::from_utf8(attribute.key.as_ref())?.to_owned();
            attributes.push((key, attribute.unescape_value()?.into_owned()));
        }
        Ok(Self {
            name,
            attributes,
            children: IndexMap::new(),
            text: String::new(),
        })
    }

    fn push_child(&mut self, name: String, value: Value) {
        match self.children.entry(name) {
            Entry::Vacant(entry) => {
                entry.insert(value);
            }
            // Element values are never arrays, so an array means the element repeats.
            Entry::Occupied(mut entry) => match entry.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }

    fn into_value(self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return if self.text.is_empty() {
                Value::Null
            } else {
                Value::String(self.text)
            };
        }
        let mut mapping = Map::new();
        for (key, value) in self.attributes {
            mapping.insert(attribute_key(&key), Value::String(value));
        }
        mapping.extend(self.children);
        if !self.text.is_empty() {
            mapping.insert(TEXT_KEY.to_owned(), Value::String(self.text));
        }
        Value::Object(mapping)
    }
}

fn close(stack: &mut [Frame], root: &mut Option<Value>, frame: Frame) -> Result<(), anyhow::Error> {
    let name = frame.name.clone();
    let value = frame.into_value();
    match stack.last_mut() {
        Some(parent) => parent.push_child(name, value),
        None if root.is_some() => anyhow::bail!("The document has more than one root element"),
        None => *root = Some(value),
    }
    Ok(())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    key: Option<&str>,
    value: &Value,
) -> Result<(), anyhow::Error> {
    let mut start = BytesStart::new(name);
    if let Some(key) = key {
        start.push_attribute(("key", key));
    }

    match value {
        Value::Null => {
            writer.write_event(Event::Empty(start))?;
        }
        Value::Array(items) if items.is_empty() => {
            writer.write_event(Event::Empty(start))?;
        }
        Value::Array(items) => {
            writer.write_event(Event::Start(start))?;
            for (index, item) in items.iter().enumerate() {
                write_element(writer, ITEM_ELEMENT, Some(&index.to_string()), item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Value::Object(mapping) => {
            let mut content = Vec::new();
            for (key, value) in mapping {
                match key.strip_prefix(ATTRIBUTE_PREFIX) {
                    Some(attribute) => {
                        let text = scalar_text(value).with_context(|| {
                            format!("The `{attribute}` attribute must hold a scalar value")
                        })?;
                        if let Some(text) = text {
                            start.push_attribute((attribute, &*text));
                        }
                    }
                    None => content.push((key, value)),
                }
            }
            if content.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            for (key, value) in content {
                if key == TEXT_KEY {
                    let text = scalar_text(value)
                        .with_context(|| format!("The text content of `<{name}>` must be a scalar value"))?;
                    if let Some(text) = text {
                        writer.write_event(Event::Text(BytesText::new(&text)))?;
                    }
                } else {
                    write_child(writer, key, value)?;
                }
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        scalar => {
            writer.write_event(Event::Start(start))?;
            if let Ok(Some(text)) = scalar_text(scalar) {
                writer.write_event(Event::Text(BytesText::new(&text)))?;
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

/// Write the entry `key` of a mapping.
///
/// Sequences are written as repeated elements.
fn write_child(writer: &mut Writer<Vec<u8>>, key: &str, value: &Value) -> Result<(), anyhow::Error> {
    let (name, item_key) = if is_element_name(key) {
        (key, None)
    } else {
        (ITEM_ELEMENT, Some(key))
    };
    match value {
        Value::Array(items) => {
            for item in items {
                write_element(writer, name, item_key, item)?;
            }
            Ok(())
        }
        _ => write_element(writer, name, item_key, value),
    }
}

/// The textual form of a scalar. `null` has none.
fn scalar_text(value: &Value) -> Result<Option<Cow<'_, str>>, anyhow::Error> {
    let text = match value {
        Value::Null => None,
        Value::Bool(true) => Some(Cow::Borrowed("1")),
        Value::Bool(false) => Some(Cow::Borrowed("0")),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Array(_) | Value::Object(_) => anyhow::bail!("Found a nested structure"),
    };
    Ok(text)
}

fn is_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
