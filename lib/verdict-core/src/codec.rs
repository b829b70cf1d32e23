//! JSON encode/decode helpers.

use bytes::Bytes;

/// Failure while decoding JSON, with the path to the offending field.
///
/// Decisions map this into the error-domain variant that matches the
/// decode stage (envelope vs payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// JSON path to the error (e.g., "Data.fact"); empty for syntax errors.
    pub path: String,
    /// Underlying serde error message.
    pub message: String,
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn to_json<T: serde::Serialize>(value: &T) -> crate::Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes with path-aware error messages.
///
/// Uses `serde_path_to_error` so a failure reports the exact field that
/// could not be deserialized.
///
/// # Errors
///
/// Returns a [`DecodeError`] if deserialization fails.
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| DecodeError {
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}
