//! Codec Module
//!
//! Converts the whole key-value map to and from bytes.
//!
//! ## Responsibilities
//! - Encode a full snapshot of the map in one pass
//! - Decode a snapshot back into an equivalent map
//! - Treat a zero-length snapshot as an empty map
//!
//! ## Formats
//! ```text
//! ┌──────────┬──────────────────────────────────────────────┐
//! │ Json     │ {"key": value, ...}\n  (self-describing)     │
//! ├──────────┼──────────────────────────────────────────────┤
//! │ Bincode  │ len (8) + [key_len (8) + key + value]*       │
//! │          │ (compact, needs a concrete value type)       │
//! └──────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Bincode is not self-describing, so it cannot decode untyped values such
//! as `serde_json::Value`. Use `Format::Json` for a `DynStore`.

mod binary;
mod json;

use std::collections::HashMap;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// On-disk encoding of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// JSON object, one document per file
    #[default]
    Json,

    /// bincode 1.x binary encoding
    Bincode,
}

impl Format {
    /// Encode the whole map
    ///
    /// Fails rather than produce a snapshot that would not decode back, such
    /// as a JSON `null` standing in for a non-finite float.
    pub fn encode<V>(&self, map: &HashMap<String, V>) -> Result<Bytes>
    where
        V: Serialize + DeserializeOwned,
    {
        match self {
            Format::Json => json::encode(map),
            Format::Bincode => binary::encode(map),
        }
    }

    /// Decode a full snapshot
    ///
    /// An empty input is an empty map: a crash between truncating the file
    /// and writing it leaves exactly that behind.
    pub fn decode<V: DeserializeOwned>(&self, bytes: &[u8]) -> Result<HashMap<String, V>> {
        if bytes.is_empty() {
            return Ok(HashMap::new());
        }

        match self {
            Format::Json => json::decode(bytes),
            Format::Bincode => binary::decode(bytes),
        }
    }
}
