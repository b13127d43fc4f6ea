//! Bincode snapshot encoding

use std::collections::HashMap;

use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub(super) fn encode<V: Serialize>(map: &HashMap<String, V>) -> Result<Bytes> {
    let size = bincode::serialized_size(map)? as usize;
    let mut writer = BytesMut::with_capacity(size).writer();
    bincode::serialize_into(&mut writer, map)?;
    Ok(writer.into_inner().freeze())
}

pub(super) fn decode<V: DeserializeOwned>(bytes: &[u8]) -> Result<HashMap<String, V>> {
    Ok(bincode::deserialize(bytes)?)
}
