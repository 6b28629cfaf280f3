//! Domain error types

use thiserror::Error;

/// Errors raised while building a request or its expectations.
///
/// Every variant describes malformed test input: the affected case fails
/// before any network call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The base URL is empty.
    #[error("URL is required")]
    EmptyUrl,

    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The timeout must be greater than zero.
    #[error("invalid timeout: {0} ms")]
    InvalidTimeout(u64),

    /// A body pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        message: String,
    },
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
