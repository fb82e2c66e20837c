//! Errors that can occur while encoding, decoding or registering codecs.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`EncoderRegistry::decode`](super::EncoderRegistry::decode).
pub enum DecodeError {
    #[error(transparent)]
    /// See [`NoCodecFound`] for details.
    NoCodecFound(#[from] NoCodecFound),
    #[error(transparent)]
    /// See [`CodecError`] for details.
    Codec(#[from] CodecError),
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`EncoderRegistry::encode`](super::EncoderRegistry::encode).
pub enum EncodeError {
    #[error(transparent)]
    /// See [`NoCodecFound`] for details.
    NoCodecFound(#[from] NoCodecFound),
    #[error(transparent)]
    /// See [`CodecError`] for details.
    Codec(#[from] CodecError),
}

#[derive(Debug, thiserror::Error)]
#[error("There is no codec registered for the `{format}` format")]
#[non_exhaustive]
/// None of the registered codecs supports the requested format.
pub struct NoCodecFound {
    /// The requested format.
    pub format: String,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to {operation} a `{format}` payload.\n{source}")]
#[non_exhaustive]
/// The codec rejected the bytes it was asked to decode, or the data it was
/// asked to encode.
pub struct CodecError {
    /// The format of the payload.
    pub format: String,
    pub(crate) operation: Operation,
    #[source]
    pub(crate) source: anyhow::Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Encode,
    Decode,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Encode => f.write_str("encode"),
            Operation::Decode => f.write_str("decode"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// The error returned by [`EncoderRegistry::new`](super::EncoderRegistry::new)
/// when a codec doesn't describe its own capabilities correctly.
pub enum InvalidCodecRegistration {
    #[error("The codec at position {position} doesn't declare any format")]
    NoFormats {
        /// The position of the codec in the registration list.
        position: usize,
    },
    #[error(
        "The codec at position {position} declares the `{format}` format, but it can neither encode nor decode it"
    )]
    UnsupportedFormat {
        /// The position of the codec in the registration list.
        position: usize,
        /// The offending format.
        format: String,
    },
}
