//! Contract Runner - reqres.in contract suite
//!
//! Wires the fixture, the suite definition, the reqwest client and the
//! suite runner together. The binary in `main.rs` is a thin shell over
//! [`run`].

pub mod fixtures;
pub mod suite;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use contract_application::{CancellationToken, ConfigError, HttpClient, HttpClientError, RunConfig};
use contract_domain::{DomainError, RunReport};
use contract_infrastructure::{
    ContractRunner, FixtureError, ReqwestHttpClient, SerializationError, to_json_stable,
};
use thiserror::Error;

pub use fixtures::{ReqresFixtures, UserPayload, resolve_fixtures_path};
pub use suite::reqres_suite;

/// Errors that stop a run before or after the cases execute.
#[derive(Debug, Error)]
pub enum AppError {
    /// The environment holds an unusable value.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The fixture could not be loaded.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// A case could not be built from the configuration.
    #[error("failed to build suite: {0}")]
    Suite(#[from] DomainError),

    /// The HTTP client could not be created.
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] HttpClientError),

    /// The report could not be serialized.
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// The report could not be written.
    #[error("failed to write report {path}: {source}")]
    ReportIo {
        /// Report path.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Runs the reqres suite over HTTP with the given configuration.
///
/// # Errors
///
/// Returns an error if the client or the suite cannot be built. Case
/// failures are reported in the returned [`RunReport`], not as errors.
pub async fn run(config: &RunConfig, fixtures: &ReqresFixtures) -> Result<RunReport, AppError> {
    let client = Arc::new(ReqwestHttpClient::new()?);
    run_with_client(client, config, fixtures).await
}

/// Runs the reqres suite through `client`.
///
/// When `suite_timeout_ms` is set, cases still in flight at the deadline
/// are cancelled and reported as such.
///
/// # Errors
///
/// Returns an error if the suite cannot be built.
pub async fn run_with_client<C: HttpClient + 'static>(
    client: Arc<C>,
    config: &RunConfig,
    fixtures: &ReqresFixtures,
) -> Result<RunReport, AppError> {
    let cases = reqres_suite(config, fixtures)?;
    tracing::info!(cases = cases.len(), base_url = %config.base_url, "starting contract run");

    let token = CancellationToken::new();
    let deadline = config.suite_timeout_ms.map(|timeout_ms| {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
            tracing::warn!(timeout_ms, "suite deadline reached, cancelling remaining cases");
            token.cancel();
        })
    });

    let report = ContractRunner::new(client).run_suite(cases, &token).await;

    if let Some(deadline) = deadline {
        deadline.abort();
    }

    tracing::info!(
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        "contract run finished"
    );
    Ok(report)
}

/// Writes `report` to `path` as stable pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub async fn write_report(path: &Path, report: &RunReport) -> Result<(), AppError> {
    let json = to_json_stable(report)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| AppError::ReportIo {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), "report written");
    Ok(())
}
