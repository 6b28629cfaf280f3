//! Contract suite runner.
//!
//! Executes cases (validate, send, evaluate) and produces reports. Cases
//! within a group run one after another; groups run concurrently.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use contract_application::ports::{CancellationReceiver, CancellationToken, HttpClient};
use contract_application::{CaseError, CaseResult, ExecuteRequest};
use contract_domain::report::{CaseFailure, CaseOutcome, CaseReport, FailureKind, RunReport};
use contract_domain::testing::ContractCase;
use tokio::task::JoinSet;

use super::ExpectationEvaluator;

/// Runs contract cases against an HTTP client.
pub struct ContractRunner<C: HttpClient> {
    execute: ExecuteRequest<C>,
    evaluator: ExpectationEvaluator,
}

impl<C: HttpClient> Clone for ContractRunner<C> {
    fn clone(&self) -> Self {
        Self {
            execute: self.execute.clone(),
            evaluator: self.evaluator,
        }
    }
}

impl<C: HttpClient + 'static> ContractRunner<C> {
    /// Creates a runner that sends requests through `client`.
    pub const fn new(client: Arc<C>) -> Self {
        Self {
            execute: ExecuteRequest::new(client),
            evaluator: ExpectationEvaluator::new(),
        }
    }

    /// Runs a single case.
    pub async fn run_case(&self, case: &ContractCase) -> CaseReport {
        let start = Instant::now();
        let (status, result) = self.attempt(case, None).await;
        log_result(case, &result);
        Self::report(case, status, &result, start.elapsed())
    }

    /// Runs a single case, abandoning the call when `cancel` fires.
    pub async fn run_case_with_cancellation(
        &self,
        case: &ContractCase,
        cancel: CancellationReceiver,
    ) -> CaseReport {
        let start = Instant::now();
        let (status, result) = self.attempt(case, Some(cancel)).await;
        log_result(case, &result);
        Self::report(case, status, &result, start.elapsed())
    }

    /// Runs every case and returns the reports in input order.
    ///
    /// Cases sharing a group run sequentially on one task; distinct groups
    /// run concurrently. A failing case never stops its siblings.
    pub async fn run_suite(&self, cases: Vec<ContractCase>, cancel: &CancellationToken) -> RunReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let placeholders: Vec<CaseReport> = cases
            .iter()
            .map(|case| Self::report(case, None, &Err(CaseError::Cancelled), Duration::ZERO))
            .collect();

        let mut tasks = JoinSet::new();
        for (group, members) in group_cases(cases) {
            let runner = self.clone();
            let receiver = cancel.receiver();
            tasks.spawn(async move {
                let mut reports = Vec::with_capacity(members.len());
                for (index, case) in members {
                    let report = runner.run_case_with_cancellation(&case, receiver.clone()).await;
                    reports.push((index, report));
                }
                tracing::debug!(%group, "group finished");
                reports
            });
        }

        let mut slots: Vec<Option<CaseReport>> = vec![None; placeholders.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(reports) => {
                    for (index, report) in reports {
                        slots[index] = Some(report);
                    }
                }
                Err(e) => tracing::error!(error = %e, "case group aborted"),
            }
        }

        let reports = slots
            .into_iter()
            .zip(placeholders)
            .map(|(slot, mut placeholder)| {
                slot.unwrap_or_else(|| {
                    placeholder.outcome = CaseOutcome::Failed(CaseFailure::new(
                        FailureKind::Cancelled,
                        "case group aborted before completion",
                    ));
                    placeholder
                })
            })
            .collect();

        RunReport::new(started_at, reports, start.elapsed())
    }

    async fn attempt(
        &self,
        case: &ContractCase,
        cancel: Option<CancellationReceiver>,
    ) -> (Option<u16>, CaseResult<()>) {
        if let Err(e) = self.evaluator.validate(&case.expectations) {
            return (None, Err(e.into()));
        }

        let executed = match cancel {
            Some(cancel) => {
                self.execute
                    .execute_with_cancellation(&case.request, cancel)
                    .await
            }
            None => self.execute.execute(&case.request).await,
        };
        let response = match executed {
            Ok(response) => response,
            Err(e) => return (None, Err(e.into())),
        };

        let result = self
            .evaluator
            .evaluate(&response, &case.expectations)
            .map_err(CaseError::from);
        (Some(response.status), result)
    }

    fn report(
        case: &ContractCase,
        status: Option<u16>,
        result: &CaseResult<()>,
        duration: Duration,
    ) -> CaseReport {
        let outcome = match result {
            Ok(()) => CaseOutcome::Passed,
            Err(e) => CaseOutcome::Failed(e.to_failure()),
        };

        CaseReport {
            group: case.group.clone(),
            name: case.name.clone(),
            method: case.request.method(),
            url: case.request.full_url().to_string(),
            outcome,
            status,
            duration,
        }
    }
}

fn log_result(case: &ContractCase, result: &CaseResult<()>) {
    match result {
        Ok(()) => tracing::info!(group = %case.group, case = %case.name, "case passed"),
        Err(e) => tracing::warn!(group = %case.group, case = %case.name, error = %e, "case failed"),
    }
}

/// Groups cases by name in order of first appearance, keeping input indices.
fn group_cases(cases: Vec<ContractCase>) -> Vec<(String, Vec<(usize, ContractCase)>)> {
    let mut groups: Vec<(String, Vec<(usize, ContractCase)>)> = Vec::new();
    for (index, case) in cases.into_iter().enumerate() {
        match groups.iter_mut().find(|(name, _)| *name == case.group) {
            Some((_, members)) => members.push((index, case)),
            None => groups.push((case.group.clone(), vec![(index, case)])),
        }
    }
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use contract_application::ports::HttpClientError;
    use contract_domain::request::RequestSpec;
    use contract_domain::response::CapturedResponse;
    use contract_domain::testing::ExpectationKind;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Routes by URL path and records dispatch order.
    #[derive(Default)]
    struct ScriptedClient {
        routes: HashMap<String, (u16, String, Duration)>,
        calls: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn route(mut self, path: &str, status: u16, body: &str) -> Self {
            self.routes
                .insert(path.to_string(), (status, body.to_string(), Duration::ZERO));
            self
        }

        fn slow_route(mut self, path: &str, delay: Duration) -> Self {
            self.routes
                .insert(path.to_string(), (200, "{}".to_string(), delay));
            self
        }
    }

    impl HttpClient for ScriptedClient {
        fn execute(
            &self,
            request: &RequestSpec,
        ) -> Pin<Box<dyn Future<Output = Result<CapturedResponse, HttpClientError>> + Send + '_>>
        {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let path = request.url().path().to_string();
            self.seen.lock().unwrap().push(path.clone());
            let route = self.routes.get(&path).cloned();
            Box::pin(async move {
                let Some((status, body, delay)) = route else {
                    return Err(HttpClientError::ConnectionRefused {
                        host: "localhost".to_string(),
                        port: 1,
                    });
                };
                tokio::time::sleep(delay).await;
                Ok(CapturedResponse::new(status, HashMap::new(), body.as_bytes(), delay))
            })
        }
    }

    fn case(group: &str, name: &str, path: &str) -> ContractCase {
        let request = RequestSpec::builder("http://localhost/api")
            .get(path)
            .build()
            .unwrap();
        ContractCase::new(group, name, request)
    }

    #[tokio::test]
    async fn test_run_case_passes() {
        let client = Arc::new(ScriptedClient::default().route("/api/users", 200, r#"{"page":2}"#));
        let runner = ContractRunner::new(Arc::clone(&client));

        let report = runner
            .run_case(
                &case("users", "list", "/users?page=2")
                    .expect_status(200)
                    .expect_json_like(json!({"page": 2})),
            )
            .await;

        assert!(report.passed());
        assert_eq!(report.status, Some(200));
        assert_eq!(report.url, "http://localhost/api/users?page=2");
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_status_mismatch_reports_both_values() {
        let client = Arc::new(ScriptedClient::default().route("/api/users", 201, "{}"));
        let runner = ContractRunner::new(client);

        let report = runner
            .run_case(&case("users", "create", "/users").expect_status(200))
            .await;

        let failure = report.failure().expect("case should fail");
        assert_eq!(failure.kind, FailureKind::Assertion);
        let assertion = failure.assertion.as_ref().expect("assertion detail");
        assert_eq!(assertion.kind, ExpectationKind::ExactStatus);
        assert_eq!(assertion.expected, "200");
        assert_eq!(assertion.actual, "201");
    }

    #[tokio::test]
    async fn test_invalid_pattern_fails_before_dispatch() {
        let client = Arc::new(ScriptedClient::default().route("/api/users", 201, "{}"));
        let runner = ContractRunner::new(Arc::clone(&client));

        let report = runner
            .run_case(&case("users", "create", "/users").expect_body_matches("(unclosed"))
            .await;

        assert_eq!(report.failure().map(|f| f.kind), Some(FailureKind::InvalidSpec));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_network_error_is_reported() {
        let runner = ContractRunner::new(Arc::new(ScriptedClient::default()));

        let report = runner.run_case(&case("status", "missing", "/nowhere")).await;

        assert_eq!(report.failure().map(|f| f.kind), Some(FailureKind::Network));
        assert_eq!(report.status, None);
    }

    #[tokio::test]
    async fn test_suite_keeps_order_and_isolates_failures() {
        let client = Arc::new(
            ScriptedClient::default()
                .route("/api/users/2", 200, r#"{"data":{"id":2}}"#)
                .route("/api/status/400", 400, "{}")
                .route("/api/unknown", 200, "{}"),
        );
        let runner = ContractRunner::new(Arc::clone(&client));

        let cases = vec![
            case("users", "get 2", "/users/2").expect_json_like(json!({"data": {"id": 2}})),
            case("status", "bad request", "/status/400").expect_status(200),
            case("users", "broken", "/missing"),
            case("resources", "unknown", "/unknown").expect_status(200),
        ];

        let report = runner.run_suite(cases, &CancellationToken::new()).await;

        let names: Vec<_> = report.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["get 2", "bad request", "broken", "unknown"]);
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(client.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_group_runs_sequentially_in_declared_order() {
        let client = Arc::new(
            ScriptedClient::default()
                .slow_route("/api/first", Duration::from_millis(30))
                .route("/api/second", 200, "{}"),
        );
        let runner = ContractRunner::new(Arc::clone(&client));

        let cases = vec![
            case("users", "first", "/first"),
            case("users", "second", "/second"),
        ];
        let report = runner.run_suite(cases, &CancellationToken::new()).await;

        assert!(report.all_passed());
        let seen = client.seen.lock().unwrap().clone();
        assert_eq!(seen, vec!["/api/first".to_string(), "/api/second".to_string()]);
    }

    #[tokio::test]
    async fn test_cancelled_suite_reports_cancelled_cases() {
        let client = Arc::new(ScriptedClient::default().slow_route("/api/slow", Duration::from_secs(10)));
        let runner = ContractRunner::new(client);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let cases = vec![case("slow", "one", "/slow"), case("slow", "two", "/slow")];
        let report = tokio::time::timeout(Duration::from_secs(2), runner.run_suite(cases, &token))
            .await
            .expect("cancellation should end the run");

        assert_eq!(report.failed, 2);
        assert!(report
            .cases
            .iter()
            .all(|c| c.failure().map(|f| f.kind) == Some(FailureKind::Cancelled)));
    }

    #[test]
    fn test_group_cases_first_appearance_order() {
        let groups = group_cases(vec![
            case("b", "1", "/x"),
            case("a", "2", "/x"),
            case("b", "3", "/x"),
        ]);
        let summary: Vec<(String, Vec<usize>)> = groups
            .into_iter()
            .map(|(name, members)| (name, members.into_iter().map(|(i, _)| i).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![("b".to_string(), vec![0, 2]), ("a".to_string(), vec![1])]
        );
    }
}
