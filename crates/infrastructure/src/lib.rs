//! Contract Infrastructure - Adapters and implementations
//!
//! This crate provides the concrete HTTP client, the expectation
//! evaluator, the suite runner and fixture loading.

pub mod adapters;
pub mod fixtures;
pub mod serialization;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use fixtures::{FixtureError, load_fixture};
pub use serialization::{SerializationError, from_json, from_json_bytes, to_json_stable};
pub use testing::{ContractRunner, ExpectationEvaluator, json_subset_match};
