//! CBOR codec for values and exported state tuples.
//!
//! Size policy lives with the caller: `Record` decoding passes
//! `MAX_STATE_BYTES`, everything else decodes unbounded.

mod cbor;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error as ThisError;

///
/// SerializeError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum SerializeError {
    #[error("cannot encode state: {0}")]
    Encode(String),

    #[error("cannot decode state: {0}")]
    Decode(String),

    #[error("encoded state is {len} bytes, over the {max_bytes} byte limit")]
    TooLarge { len: usize, max_bytes: usize },
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializeError> {
    cbor::encode(value)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializeError> {
    cbor::decode(bytes)
}

/// Like [`decode`], but refuses inputs longer than `max_bytes` up front.
pub fn decode_bounded<T: DeserializeOwned>(
    bytes: &[u8],
    max_bytes: usize,
) -> Result<T, SerializeError> {
    if bytes.len() > max_bytes {
        return Err(SerializeError::TooLarge {
            len: bytes.len(),
            max_bytes,
        });
    }

    cbor::decode(bytes)
}
