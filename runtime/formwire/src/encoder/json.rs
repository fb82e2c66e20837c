use bytes::Bytes;
use serde_json::Value;

use super::{Codec, format};

#[derive(Debug, Default, Clone, Copy)]
/// The JSON codec, built on top of `serde_json`.
///
/// Object keys are kept in document order.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn formats(&self) -> &'static [&'static str] {
        &[format::JSON]
    }

    fn encode(&self, data: &Value, _root_name: Option<&str>) -> Result<Bytes, anyhow::Error> {
        Ok(serde_json::to_vec(data)?.into())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, anyhow::Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}
