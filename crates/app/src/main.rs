//! Contract Runner binary.
//!
//! Runs the reqres suite once, prints the report and exits non-zero when
//! any case failed.

use std::process::ExitCode;

use contract_application::RunConfig;
use contract_infrastructure::load_fixture;
use contract_runner::{AppError, ReqresFixtures, resolve_fixtures_path, run, write_report};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match execute().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "contract run aborted");
            ExitCode::FAILURE
        }
    }
}

async fn execute() -> Result<bool, AppError> {
    let config = RunConfig::from_env()?.install()?;
    let fixtures: ReqresFixtures =
        load_fixture(resolve_fixtures_path(&config.fixtures_path)).await?;

    let report = run(config, &fixtures).await?;
    println!("{report}");

    if let Some(path) = &config.report_path {
        write_report(path, &report).await?;
    }

    Ok(report.all_passed())
}
