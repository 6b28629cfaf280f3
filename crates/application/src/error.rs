//! Case-level error types

use contract_domain::{AssertionFailure, CaseFailure, DomainError, FailureKind};
use thiserror::Error;

use crate::execute_request::ExecuteRequestError;
use crate::ports::HttpClientError;

/// Everything that can end a contract case early.
///
/// Each variant terminates the current case only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaseError {
    /// The request or an expectation was malformed.
    #[error("invalid spec: {0}")]
    InvalidSpec(#[from] DomainError),

    /// The call failed at the transport level.
    #[error("network error: {0}")]
    Network(HttpClientError),

    /// No response within the timeout.
    #[error("no response within {timeout_ms} ms")]
    Timeout {
        /// The timeout that elapsed.
        timeout_ms: u64,
    },

    /// The run was cancelled while the call was in flight.
    #[error("cancelled")]
    Cancelled,

    /// The response violated an expectation.
    #[error("{0}")]
    Assertion(#[from] AssertionFailure),
}

impl CaseError {
    /// Returns the report category of this error.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidSpec(_) => FailureKind::InvalidSpec,
            Self::Network(_) => FailureKind::Network,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Cancelled => FailureKind::Cancelled,
            Self::Assertion(_) => FailureKind::Assertion,
        }
    }

    /// Converts this error into the failure recorded in a case report.
    #[must_use]
    pub fn to_failure(&self) -> CaseFailure {
        match self {
            Self::Assertion(failure) => CaseFailure::assertion(failure.clone()),
            other => CaseFailure::new(other.kind(), other.to_string()),
        }
    }
}

impl From<HttpClientError> for CaseError {
    fn from(error: HttpClientError) -> Self {
        match error {
            HttpClientError::Timeout { timeout_ms } => Self::Timeout { timeout_ms },
            HttpClientError::Cancelled => Self::Cancelled,
            HttpClientError::InvalidUrl(url) => Self::InvalidSpec(DomainError::InvalidUrl(url)),
            other => Self::Network(other),
        }
    }
}

impl From<ExecuteRequestError> for CaseError {
    fn from(error: ExecuteRequestError) -> Self {
        match error {
            ExecuteRequestError::InvalidUrl(url) => Self::InvalidSpec(DomainError::InvalidUrl(url)),
            ExecuteRequestError::HttpError(e) => e.into(),
        }
    }
}

/// Result type alias for case execution.
pub type CaseResult<T> = Result<T, CaseError>;
