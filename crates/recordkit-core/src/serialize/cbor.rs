use crate::serialize::SerializeError;
use serde::{Serialize, de::DeserializeOwned};
use std::panic::{AssertUnwindSafe, catch_unwind};

pub(super) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializeError> {
    serde_cbor::to_vec(value).map_err(|e| SerializeError::Encode(e.to_string()))
}

// serde_cbor can panic on some malformed inputs; that is reported as a
// decode failure like any other.
pub(super) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializeError> {
    catch_unwind(AssertUnwindSafe(|| serde_cbor::from_slice(bytes)))
        .map_err(|_| SerializeError::Decode("decoder panicked".to_string()))?
        .map_err(|e| SerializeError::Decode(e.to_string()))
}
