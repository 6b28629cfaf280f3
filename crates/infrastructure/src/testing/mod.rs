//! Contract testing infrastructure.
//!
//! The evaluator checks expectations against captured responses; the
//! runner drives whole suites through an [`HttpClient`](contract_application::HttpClient).

mod evaluator;
mod runner;

pub use evaluator::{ExpectationEvaluator, SubsetMismatch, json_subset_match};
pub use runner::ContractRunner;
