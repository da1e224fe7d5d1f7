//! Versioned bincode codec
//!
//! Default codec for every collection type.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CollectionError, Result};

use super::Codec;

/// Current record format version, written as the first byte of every record
pub const FORMAT_VERSION: u8 = 1;

/// Codec for any `serde` type: one version byte followed by bincode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BincodeCodec;

impl<T> Codec<T> for BincodeCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<Vec<u8>> {
        let payload_len = bincode::serialized_size(value)
            .map_err(|e| CollectionError::Encoding(e.to_string()))?;

        let mut bytes = Vec::with_capacity(1 + payload_len as usize);
        bytes.push(FORMAT_VERSION);
        bincode::serialize_into(&mut bytes, value)
            .map_err(|e| CollectionError::Encoding(e.to_string()))?;

        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<T> {
        let (version, payload) = bytes
            .split_first()
            .ok_or_else(|| CollectionError::Decoding("empty record".to_string()))?;

        if *version != FORMAT_VERSION {
            return Err(CollectionError::Decoding(format!(
                "Unsupported record version: {}",
                version
            )));
        }

        bincode::deserialize(payload).map_err(|e| CollectionError::Decoding(e.to_string()))
    }
}
