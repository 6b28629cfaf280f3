//! What a single execution observed: status, headers, body and timing.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a captured response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ResponseBody {
    /// Zero-length body.
    #[default]
    Empty,
    /// Body parsed as JSON.
    Json(Value),
    /// Body that is not valid JSON, decoded as lossy UTF-8.
    Text(String),
}

impl ResponseBody {
    /// Classifies raw body bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::Empty;
        }
        serde_json::from_slice(bytes).map_or_else(
            |_| Self::Text(String::from_utf8_lossy(bytes).into_owned()),
            Self::Json,
        )
    }

    /// Serializes the body to text.
    ///
    /// JSON bodies are rendered compactly, text bodies are returned as-is
    /// and an empty body is the empty string.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Returns the JSON value, if the body parsed as JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true for a zero-length body.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Response captured by one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Response body.
    #[serde(default)]
    pub body: ResponseBody,
    /// Time from dispatch until the body was fully read.
    #[serde(with = "duration_millis")]
    pub duration: Duration,
    /// Body length in bytes.
    pub size: usize,
}

impl CapturedResponse {
    /// Captures a response, classifying the raw body.
    #[must_use]
    pub fn new(status: u16, headers: HashMap<String, String>, body: &[u8], duration: Duration) -> Self {
        Self {
            status,
            headers,
            body: ResponseBody::from_bytes(body),
            duration,
            size: body.len(),
        }
    }

    /// Looks up a header, ignoring the case of `name`.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the body serialized to text.
    #[must_use]
    pub fn body_text(&self) -> String {
        self.body.to_text()
    }
}

/// Serializes a `Duration` as whole milliseconds.
pub(crate) mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_possible_truncation)]
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_body_is_parsed() {
        let response = CapturedResponse::new(
            200,
            HashMap::new(),
            br#"{"page": 2, "data": []}"#,
            Duration::from_millis(12),
        );

        assert_eq!(response.body.as_json(), Some(&json!({"page": 2, "data": []})));
        assert_eq!(response.size, 23);
    }

    #[test]
    fn test_text_body_is_kept() {
        let response = CapturedResponse::new(502, HashMap::new(), b"<html>bad</html>", Duration::ZERO);
        assert_eq!(response.body, ResponseBody::Text("<html>bad</html>".to_string()));
        assert_eq!(response.body_text(), "<html>bad</html>");
    }

    #[test]
    fn test_empty_body() {
        let response = CapturedResponse::new(204, HashMap::new(), b"", Duration::ZERO);
        assert!(response.body.is_empty());
        assert_eq!(response.body_text(), "");
    }

    #[test]
    fn test_json_body_text_is_compact() {
        let body = ResponseBody::from_bytes(b"{ \"createdAt\" : \"2024-01-01\" }");
        assert_eq!(body.to_text(), r#"{"createdAt":"2024-01-01"}"#);
    }

    #[test]
    fn test_get_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        let response = CapturedResponse::new(200, headers, b"{}", Duration::ZERO);

        assert_eq!(response.get_header("Content-Type"), Some("application/json"));
        assert_eq!(response.get_header("X-Missing"), None);
    }
}
