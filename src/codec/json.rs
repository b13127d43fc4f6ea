//! JSON snapshot encoding

use std::collections::HashMap;
use std::io::Write;

use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, SnapError};

pub(super) fn encode<V>(map: &HashMap<String, V>) -> Result<Bytes>
where
    V: Serialize + DeserializeOwned,
{
    let mut writer = BytesMut::new().writer();
    serde_json::to_writer(&mut writer, map)?;
    writer.write_all(b"\n")?;
    let bytes = writer.into_inner().freeze();

    // serde_json writes NaN and infinities as `null`, which may not decode as V
    if contains_null(&bytes) {
        decode::<V>(&bytes).map_err(|e| {
            SnapError::Serialization(format!("json: snapshot would not load back ({})", e))
        })?;
    }

    Ok(bytes)
}

pub(super) fn decode<V: DeserializeOwned>(bytes: &[u8]) -> Result<HashMap<String, V>> {
    Ok(serde_json::from_slice(bytes)?)
}

fn contains_null(bytes: &[u8]) -> bool {
    bytes.windows(4).any(|window| window == b"null")
}
