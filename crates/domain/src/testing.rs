//! Contract cases and expectations.
//!
//! This module provides types for declaring what a response must look like.
//! Evaluation lives in the infrastructure layer.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::request::RequestSpec;

/// An expectation checked against a captured response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Status code must equal the expected value.
    ExactStatus {
        /// Expected status code.
        code: u16,
    },
    /// Body must contain at least the given JSON fields and values.
    JsonSubsetMatch {
        /// Partial JSON document.
        subset: Value,
    },
    /// Body text must contain a match for the pattern.
    BodyRegexMatch {
        /// Regex pattern.
        pattern: String,
    },
    /// Body must be empty.
    EmptyBody,
}

impl Expectation {
    /// Returns the kind of this expectation.
    #[must_use]
    pub const fn kind(&self) -> ExpectationKind {
        match self {
            Self::ExactStatus { .. } => ExpectationKind::ExactStatus,
            Self::JsonSubsetMatch { .. } => ExpectationKind::JsonSubsetMatch,
            Self::BodyRegexMatch { .. } => ExpectationKind::BodyRegexMatch,
            Self::EmptyBody => ExpectationKind::EmptyBody,
        }
    }

    /// Returns the expected value rendered for reports.
    #[must_use]
    pub fn expected_display(&self) -> String {
        match self {
            Self::ExactStatus { code } => code.to_string(),
            Self::JsonSubsetMatch { subset } => subset.to_string(),
            Self::BodyRegexMatch { pattern } => format!("/{pattern}/"),
            Self::EmptyBody => "<empty>".to_string(),
        }
    }

    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::ExactStatus { code } => format!("Status code = {code}"),
            Self::JsonSubsetMatch { subset } => format!("JSON like {subset}"),
            Self::BodyRegexMatch { pattern } => format!("Body matches /{pattern}/"),
            Self::EmptyBody => "Body is empty".to_string(),
        }
    }
}

/// Discriminant of an [`Expectation`], used in failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationKind {
    /// Exact status code.
    ExactStatus,
    /// JSON subset match.
    JsonSubsetMatch,
    /// Regex match against the body text.
    BodyRegexMatch,
    /// Empty body.
    EmptyBody,
}

impl ExpectationKind {
    /// Returns a short label for the kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ExactStatus => "status",
            Self::JsonSubsetMatch => "json subset",
            Self::BodyRegexMatch => "body regex",
            Self::EmptyBody => "empty body",
        }
    }
}

impl fmt::Display for ExpectationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An unmet expectation with expected and actual values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionFailure {
    /// Kind of expectation that failed.
    pub kind: ExpectationKind,
    /// Expected value.
    pub expected: String,
    /// Observed value.
    pub actual: String,
    /// JSON path of the first mismatch, for subset matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl AssertionFailure {
    /// Creates a failure without a JSON path.
    #[must_use]
    pub fn new(kind: ExpectationKind, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            kind,
            expected: expected.into(),
            actual: actual.into(),
            path: None,
        }
    }

    /// Attaches the JSON path of the mismatch.
    #[must_use]
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} expectation failed", self.kind)?;
        if let Some(path) = &self.path {
            write!(f, " at {path}")?;
        }
        write!(f, ": expected {}, got {}", self.expected, self.actual)
    }
}

impl std::error::Error for AssertionFailure {}

/// One contract test: a request plus the expectations its response must meet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCase {
    /// Group the case belongs to; cases in a group run one after another.
    pub group: String,
    /// Case name.
    pub name: String,
    /// The request to send.
    pub request: RequestSpec,
    /// Ordered expectations; all must hold.
    #[serde(default)]
    pub expectations: Vec<Expectation>,
}

impl ContractCase {
    /// Creates a case without expectations.
    #[must_use]
    pub fn new(group: impl Into<String>, name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            request,
            expectations: Vec::new(),
        }
    }

    /// Adds an expectation (builder pattern).
    #[must_use]
    pub fn expect(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Expects an exact status code.
    #[must_use]
    pub fn expect_status(self, code: u16) -> Self {
        self.expect(Expectation::ExactStatus { code })
    }

    /// Expects the JSON body to contain `subset`.
    #[must_use]
    pub fn expect_json_like(self, subset: Value) -> Self {
        self.expect(Expectation::JsonSubsetMatch { subset })
    }

    /// Expects the body text to match `pattern`.
    #[must_use]
    pub fn expect_body_matches(self, pattern: impl Into<String>) -> Self {
        self.expect(Expectation::BodyRegexMatch {
            pattern: pattern.into(),
        })
    }

    /// Expects an empty body.
    #[must_use]
    pub fn expect_empty_body(self) -> Self {
        self.expect(Expectation::EmptyBody)
    }
}
