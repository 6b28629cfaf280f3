//! Per-case and per-run reports.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::request::HttpMethod;
use crate::testing::AssertionFailure;

/// Why a case failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Malformed request or expectation.
    InvalidSpec,
    /// Connection, DNS or transport failure.
    Network,
    /// No response within the timeout.
    Timeout,
    /// The run was cancelled while the case was in flight.
    Cancelled,
    /// The response violated an expectation.
    Assertion,
}

impl FailureKind {
    /// Returns a short label for the kind.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InvalidSpec => "invalid spec",
            Self::Network => "network",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::Assertion => "assertion",
        }
    }
}

/// Failure detail of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable message.
    pub message: String,
    /// Expectation detail for assertion failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assertion: Option<AssertionFailure>,
}

impl CaseFailure {
    /// Creates a failure without assertion detail.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            assertion: None,
        }
    }

    /// Creates an assertion failure.
    #[must_use]
    pub fn assertion(failure: AssertionFailure) -> Self {
        Self {
            kind: FailureKind::Assertion,
            message: failure.to_string(),
            assertion: Some(failure),
        }
    }
}

/// Outcome of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// All expectations held.
    Passed,
    /// The case failed.
    Failed(CaseFailure),
}

/// Result of running one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    /// Group name.
    pub group: String,
    /// Case name.
    pub name: String,
    /// Request method.
    pub method: HttpMethod,
    /// Request URL including query.
    pub url: String,
    /// Outcome.
    pub outcome: CaseOutcome,
    /// Status code, when a response was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Wall time of the case.
    #[serde(with = "crate::response::duration_millis")]
    pub duration: Duration,
}

impl CaseReport {
    /// Returns true if the case passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Passed)
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&CaseFailure> {
        match &self.outcome {
            CaseOutcome::Passed => None,
            CaseOutcome::Failed(failure) => Some(failure),
        }
    }
}

impl fmt::Display for CaseReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.passed() { "PASS" } else { "FAIL" };
        write!(
            f,
            "[{mark}] {} > {} ({} {}, {} ms)",
            self.group,
            self.name,
            self.method,
            self.url,
            self.duration.as_millis()
        )?;
        if let Some(failure) = self.failure() {
            write!(f, "\n       {}: {}", failure.kind.label(), failure.message)?;
        }
        Ok(())
    }
}

/// Results from running a suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Case reports in declaration order.
    pub cases: Vec<CaseReport>,
    /// Total number of cases.
    pub total: usize,
    /// Number of passed cases.
    pub passed: usize,
    /// Number of failed cases.
    pub failed: usize,
    /// Execution time of the whole run.
    #[serde(with = "crate::response::duration_millis")]
    pub duration: Duration,
}

impl RunReport {
    /// Creates a report and computes the counters.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, cases: Vec<CaseReport>, duration: Duration) -> Self {
        let total = cases.len();
        let passed = cases.iter().filter(|c| c.passed()).count();

        Self {
            started_at,
            cases,
            total,
            passed,
            failed: total - passed,
            duration,
        }
    }

    /// Check if all cases passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Iterates over failed cases.
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|c| !c.passed())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(f, "{case}")?;
        }
        write!(
            f,
            "\n{} cases: {} passed, {} failed ({} ms)",
            self.total,
            self.passed,
            self.failed,
            self.duration.as_millis()
        )
    }
}
