//! Contract Domain - Core types
//!
//! This crate defines the domain model for the HTTP contract test runner:
//! request specifications, captured responses, expectations and reports.
//! All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod report;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use report::{CaseFailure, CaseOutcome, CaseReport, FailureKind, RunReport};
pub use request::{DEFAULT_TIMEOUT_MS, HttpMethod, QueryParams, RequestSpec, RequestSpecBuilder};
pub use response::{CapturedResponse, ResponseBody};
pub use testing::{AssertionFailure, ContractCase, Expectation, ExpectationKind};
