//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different on-disk encoding. Whatever
//! the encoding, a collection must come back as an object keyed by record id.

use crate::error::{Error, Result};
use crate::Collection;
use serde_json::Value;

/// Converts whole collections to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode a collection to bytes.
    fn serialize(&self, data: &Collection) -> Result<Vec<u8>>;

    /// Decode bytes back into a collection. Must reject anything that is not
    /// an object at the top level.
    fn deserialize(&self, bytes: &[u8]) -> Result<Collection>;
}

/// JSON serializer with optional pretty-printing.
#[derive(Debug, Clone, Default)]
pub struct JsonSerializer {
    pretty: bool,
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    /// `true` when this serializer indents its output.
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, data: &Collection) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(data)
        } else {
            serde_json::to_vec(data)
        };
        bytes.map_err(|e| Error::Serialize(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Collection> {
        match serde_json::from_slice::<Value>(bytes)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::DataCorruption(format!(
                "expected a JSON object at the top level, found {}",
                kind_of(&other)
            ))),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
