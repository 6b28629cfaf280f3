//! Expectation evaluation.
//!
//! Checks captured responses against ordered expectations and reports the
//! first one that does not hold.

use contract_domain::response::CapturedResponse;
use contract_domain::testing::{AssertionFailure, Expectation, ExpectationKind};
use contract_domain::{DomainError, DomainResult};
use regex::Regex;
use serde_json::Value;

const PREVIEW_CHARS: usize = 100;

/// Evaluates expectations against a captured response.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpectationEvaluator;

impl ExpectationEvaluator {
    /// Creates a new evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks that every expectation is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPattern`] for the first regex that does not compile.
    pub fn validate(&self, expectations: &[Expectation]) -> DomainResult<()> {
        for expectation in expectations {
            if let Expectation::BodyRegexMatch { pattern } = expectation {
                Regex::new(pattern).map_err(|e| DomainError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
            }
        }
        Ok(())
    }

    /// Evaluates expectations in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the [`AssertionFailure`] of the first unmet expectation.
    pub fn evaluate(
        &self,
        response: &CapturedResponse,
        expectations: &[Expectation],
    ) -> Result<(), AssertionFailure> {
        expectations
            .iter()
            .try_for_each(|expectation| self.check(expectation, response))
    }

    /// Evaluates a single expectation.
    ///
    /// # Errors
    ///
    /// Returns an [`AssertionFailure`] carrying expected and actual values.
    pub fn check(
        &self,
        expectation: &Expectation,
        response: &CapturedResponse,
    ) -> Result<(), AssertionFailure> {
        match expectation {
            Expectation::ExactStatus { code } => Self::check_status(response, *code),
            Expectation::JsonSubsetMatch { subset } => Self::check_json_subset(response, subset),
            Expectation::BodyRegexMatch { pattern } => Self::check_body_regex(response, pattern),
            Expectation::EmptyBody => Self::check_empty_body(response),
        }
    }

    fn check_status(response: &CapturedResponse, expected: u16) -> Result<(), AssertionFailure> {
        if response.status == expected {
            Ok(())
        } else {
            Err(AssertionFailure::new(
                ExpectationKind::ExactStatus,
                expected.to_string(),
                response.status.to_string(),
            ))
        }
    }

    fn check_json_subset(
        response: &CapturedResponse,
        subset: &Value,
    ) -> Result<(), AssertionFailure> {
        let Some(actual) = response.body.as_json() else {
            return Err(AssertionFailure::new(
                ExpectationKind::JsonSubsetMatch,
                subset.to_string(),
                format!("non-JSON body: {}", preview(&response.body_text())),
            ));
        };

        json_subset_match(subset, actual).map_err(|mismatch| {
            AssertionFailure::new(
                ExpectationKind::JsonSubsetMatch,
                mismatch.expected,
                mismatch.actual,
            )
            .at_path(mismatch.path)
        })
    }

    fn check_body_regex(response: &CapturedResponse, pattern: &str) -> Result<(), AssertionFailure> {
        let expected = format!("/{pattern}/");
        let regex = Regex::new(pattern).map_err(|e| {
            AssertionFailure::new(
                ExpectationKind::BodyRegexMatch,
                expected.clone(),
                format!("invalid pattern: {e}"),
            )
        })?;

        let body = response.body_text();
        if regex.is_match(&body) {
            Ok(())
        } else {
            Err(AssertionFailure::new(
                ExpectationKind::BodyRegexMatch,
                expected,
                preview(&body),
            ))
        }
    }

    fn check_empty_body(response: &CapturedResponse) -> Result<(), AssertionFailure> {
        if response.body.is_empty() {
            Ok(())
        } else {
            Err(AssertionFailure::new(
                ExpectationKind::EmptyBody,
                "<empty>",
                preview(&response.body_text()),
            ))
        }
    }
}

/// First difference found by [`json_subset_match`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsetMismatch {
    /// JSON path of the mismatch (`$.data.id`).
    pub path: String,
    /// Expected value at the path.
    pub expected: String,
    /// Actual value at the path, or `<missing>`.
    pub actual: String,
}

/// Checks that `actual` contains everything in `expected`.
///
/// Objects match when every expected key exists with a matching value;
/// extra keys are ignored. Arrays match element-wise over the expected
/// elements. Numbers compare numerically, everything else by equality.
///
/// # Errors
///
/// Returns the first [`SubsetMismatch`] in document order.
pub fn json_subset_match(expected: &Value, actual: &Value) -> Result<(), SubsetMismatch> {
    subset_at(expected, actual, "$")
}

fn subset_at(expected: &Value, actual: &Value, path: &str) -> Result<(), SubsetMismatch> {
    match (expected, actual) {
        (Value::Object(expected), Value::Object(actual)) => {
            for (key, expected_value) in expected {
                let child = format!("{path}.{key}");
                match actual.get(key) {
                    Some(actual_value) => subset_at(expected_value, actual_value, &child)?,
                    None => return Err(mismatch(child, expected_value.to_string(), "<missing>")),
                }
            }
            Ok(())
        }
        (Value::Array(expected), Value::Array(actual)) => {
            if actual.len() < expected.len() {
                return Err(mismatch(
                    path.to_string(),
                    format!("array with at least {} items", expected.len()),
                    format!("array with {} items", actual.len()),
                ));
            }
            for (index, (expected_item, actual_item)) in expected.iter().zip(actual).enumerate() {
                subset_at(expected_item, actual_item, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        (Value::Number(e), Value::Number(a)) if numbers_equal(e, a) => Ok(()),
        (e, a) if !e.is_number() && e == a => Ok(()),
        (e, a) => Err(mismatch(path.to_string(), e.to_string(), a.to_string())),
    }
}

#[allow(clippy::float_cmp)]
fn numbers_equal(expected: &serde_json::Number, actual: &serde_json::Number) -> bool {
    if let (Some(e), Some(a)) = (expected.as_i64(), actual.as_i64()) {
        return e == a;
    }
    if let (Some(e), Some(a)) = (expected.as_u64(), actual.as_u64()) {
        return e == a;
    }
    match (expected.as_f64(), actual.as_f64()) {
        (Some(e), Some(a)) => e == a,
        _ => false,
    }
}

fn mismatch(path: String, expected: impl Into<String>, actual: impl Into<String>) -> SubsetMismatch {
    SubsetMismatch {
        path,
        expected: expected.into(),
        actual: actual.into(),
    }
}

fn preview(body: &str) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    if body.chars().count() > PREVIEW_CHARS {
        let head: String = body.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}
