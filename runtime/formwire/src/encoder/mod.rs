//! Convert bytes to and from the [untyped representation](crate::representation).
//!
//! [`EncoderRegistry`] is the key type in this module: it aggregates several
//! [`Codec`]s behind a single encode/decode facade and picks the right one
//! for each format.
use bytes::Bytes;
use serde_json::Value;

use errors::{
    CodecError, DecodeError, EncodeError, InvalidCodecRegistration, NoCodecFound, Operation,
};

pub use json::JsonCodec;
pub use xml::XmlCodec;

pub mod errors;
mod json;
mod xml;

/// The names of the built-in formats.
pub mod format {
    pub const JSON: &str = "json";
    pub const XML: &str = "xml";
}

/// A wire format, or a family of closely related ones.
///
/// Implementations must describe their own capabilities: [`formats`](Codec::formats)
/// lists every format the codec handles, and each of them must be accepted by
/// [`supports_encoding`](Codec::supports_encoding) or
/// [`supports_decoding`](Codec::supports_decoding).
/// [`EncoderRegistry::new`] verifies it.
pub trait Codec: std::fmt::Debug + Send + Sync {
    /// The formats handled by this codec.
    fn formats(&self) -> &'static [&'static str];

    fn supports_encoding(&self, format: &str) -> bool {
        self.formats().iter().any(|f| *f == format)
    }

    fn supports_decoding(&self, format: &str) -> bool {
        self.formats().iter().any(|f| *f == format)
    }

    /// Encode `data`.
    ///
    /// `root_name` is the name of the document element, for formats that have one.
    /// Other formats ignore it.
    fn encode(&self, data: &Value, root_name: Option<&str>) -> Result<Bytes, anyhow::Error>;

    /// Decode `bytes`.
    ///
    /// An empty payload decodes to [`Value::Null`].
    fn decode(&self, bytes: &[u8]) -> Result<Value, anyhow::Error>;
}

#[derive(Debug)]
/// A collection of codecs, queried in registration order.
///
/// The first codec that supports a format wins.
pub struct EncoderRegistry {
    codecs: Vec<Box<dyn Codec>>,
}

impl Default for EncoderRegistry {
    fn default() -> Self {
        Self::with_default_codecs()
    }
}

impl EncoderRegistry {
    /// Build a registry out of a list of codecs.
    ///
    /// It fails if any codec doesn't declare its formats, or declares a format
    /// that it then refuses to handle.
    pub fn new(codecs: Vec<Box<dyn Codec>>) -> Result<Self, InvalidCodecRegistration> {
        for (position, codec) in codecs.iter().enumerate() {
            let formats = codec.formats();
            if formats.is_empty() {
                return Err(InvalidCodecRegistration::NoFormats { position });
            }
            if let Some(format) = formats
                .iter()
                .find(|f| !codec.supports_encoding(f) && !codec.supports_decoding(f))
            {
                return Err(InvalidCodecRegistration::UnsupportedFormat {
                    position,
                    format: (*format).to_owned(),
                });
            }
        }
        Ok(Self { codecs })
    }

    /// A registry with the built-in codecs: [`JsonCodec`] and [`XmlCodec`].
    pub fn with_default_codecs() -> Self {
        Self {
            codecs: vec![Box::new(JsonCodec), Box::new(XmlCodec::default())],
        }
    }

    pub fn supports_encoding(&self, format: &str) -> bool {
        self.codecs.iter().any(|c| c.supports_encoding(format))
    }

    pub fn supports_decoding(&self, format: &str) -> bool {
        self.codecs.iter().any(|c| c.supports_decoding(format))
    }

    /// The first codec that can encode `format`.
    pub fn encoder(&self, format: &str) -> Result<&dyn Codec, NoCodecFound> {
        self.find(format, |c| c.supports_encoding(format))
    }

    /// The first codec that can decode `format`.
    pub fn decoder(&self, format: &str) -> Result<&dyn Codec, NoCodecFound> {
        self.find(format, |c| c.supports_decoding(format))
    }

    pub fn encode(&self, data: &Value, format: &str) -> Result<Bytes, EncodeError> {
        self.encode_with_root(data, format, None)
    }

    /// Encode `data`, using `root_name` as the document element for formats
    /// that have one.
    pub fn encode_with_root(
        &self,
        data: &Value,
        format: &str,
        root_name: Option<&str>,
    ) -> Result<Bytes, EncodeError> {
        let codec = self.encoder(format)?;
        let bytes = codec
            .encode(data, root_name)
            .map_err(|source| CodecError {
                format: format.to_owned(),
                operation: Operation::Encode,
                source,
            })?;
        Ok(bytes)
    }

    pub fn decode(&self, bytes: &[u8], format: &str) -> Result<Value, DecodeError> {
        let codec = self.decoder(format)?;
        let data = codec.decode(bytes).map_err(|source| CodecError {
            format: format.to_owned(),
            operation: Operation::Decode,
            source,
        })?;
        Ok(data)
    }

    fn find<F>(&self, format: &str, predicate: F) -> Result<&dyn Codec, NoCodecFound>
    where
        F: Fn(&dyn Codec) -> bool,
    {
        self.codecs
            .iter()
            .map(|c| c.as_ref())
            .find(|c| predicate(*c))
            .ok_or_else(|| NoCodecFound {
                format: format.to_owned(),
            })
    }
}
