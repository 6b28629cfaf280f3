//! Execute Request Use Case
//!
//! Sends one request through the `HttpClient` port and returns the
//! captured response or error. There is no retry: a failed call is
//! surfaced to the caller immediately.

use std::sync::Arc;

use contract_domain::{request::RequestSpec, response::CapturedResponse};
use thiserror::Error;

use crate::ports::{CancellationReceiver, HttpClient, HttpClientError};

/// Result type for request execution.
pub type ExecuteResult = Result<CapturedResponse, ExecuteRequestError>;

/// Error type for the execute request use case.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecuteRequestError {
    /// URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed.
    #[error("{0}")]
    HttpError(#[from] HttpClientError),
}

/// Use case for executing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let client = ReqwestHttpClient::new()?;
/// let use_case = ExecuteRequest::new(Arc::new(client));
///
/// let request = RequestSpec::builder("https://reqres.in/api").get("/users/2").build()?;
/// let response = use_case.execute(&request).await?;
/// ```
pub struct ExecuteRequest<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> Clone for ExecuteRequest<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Executes the request and returns the result.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteRequestError` on validation or HTTP failures.
    pub async fn execute(&self, request: &RequestSpec) -> ExecuteResult {
        Self::validate(request)?;

        tracing::debug!(method = %request.method(), url = %request.full_url(), "dispatching request");
        let response = self.client.execute(request).await?;

        Ok(response)
    }

    /// Executes the request with cancellation support.
    ///
    /// When the receiver fires first, the in-flight call is dropped and
    /// [`HttpClientError::Cancelled`] is returned.
    ///
    /// # Errors
    ///
    /// Returns `ExecuteRequestError` on validation, HTTP failure or cancellation.
    pub async fn execute_with_cancellation(
        &self,
        request: &RequestSpec,
        mut cancel: CancellationReceiver,
    ) -> ExecuteResult {
        Self::validate(request)?;

        if cancel.is_cancelled() {
            return Err(ExecuteRequestError::HttpError(HttpClientError::Cancelled));
        }

        tracing::debug!(method = %request.method(), url = %request.full_url(), "dispatching request");
        tokio::select! {
            result = self.client.execute(request) => {
                result.map_err(ExecuteRequestError::from)
            }
            () = cancel.cancelled() => {
                tracing::debug!(url = %request.full_url(), "request abandoned after cancellation");
                Err(ExecuteRequestError::HttpError(HttpClientError::Cancelled))
            }
        }
    }

    fn validate(request: &RequestSpec) -> Result<(), ExecuteRequestError> {
        if !matches!(request.url().scheme(), "http" | "https") {
            return Err(ExecuteRequestError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }
        Ok(())
    }
}
