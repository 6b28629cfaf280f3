//! Contract Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The request execution use case
//! - Run-wide configuration
//! - Case-level error handling

pub mod config;
pub mod error;
pub mod execute_request;
pub mod ports;

pub use config::{ConfigError, DEFAULT_BASE_URL, DEFAULT_FIXTURES_PATH, RunConfig};
pub use error::{CaseError, CaseResult};
pub use execute_request::{ExecuteRequest, ExecuteRequestError, ExecuteResult};
pub use ports::{CancellationReceiver, CancellationToken, HttpClient, HttpClientError};
