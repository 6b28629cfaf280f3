//! JSON helpers for fixtures and reports.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// A value could not be written as JSON.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Input was not valid JSON for the requested type.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Renders `value` as pretty JSON (two-space indent) ending in a newline.
///
/// Output for the same value is byte-for-byte stable, so reports can be
/// diffed between runs.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut json = serde_json::to_string_pretty(value).map_err(SerializationError::Serialize)?;
    json.push('\n');
    Ok(json)
}

/// Parses JSON text.
///
/// # Errors
///
/// Returns an error if the text is not valid JSON for `T`.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    from_json_bytes(json.as_bytes())
}

/// Parses JSON bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not valid JSON for `T`.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}
