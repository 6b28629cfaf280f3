//! Run-wide configuration.
//!
//! A `RunConfig` is built once at start-up, installed process-wide and
//! never mutated afterwards. Every request built through it shares the
//! same base URL and default timeout.

use std::path::PathBuf;
use std::sync::OnceLock;

use contract_domain::request::{DEFAULT_TIMEOUT_MS, RequestSpecBuilder};
use contract_domain::{HttpMethod, RequestSpec};
use thiserror::Error;

/// Base URL of the API under test.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/api";

/// Default location of the test-data fixture.
pub const DEFAULT_FIXTURES_PATH: &str = "crates/app/data/reqres.data.json";

const ENV_BASE_URL: &str = "CONTRACT_BASE_URL";
const ENV_TIMEOUT_MS: &str = "CONTRACT_TIMEOUT_MS";
const ENV_FIXTURES: &str = "CONTRACT_FIXTURES";
const ENV_SUITE_TIMEOUT_MS: &str = "CONTRACT_SUITE_TIMEOUT_MS";
const ENV_REPORT: &str = "CONTRACT_REPORT";

static GLOBAL: OnceLock<RunConfig> = OnceLock::new();

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable holds a value that cannot be used.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// `install` was called twice.
    #[error("run configuration is already installed")]
    AlreadyInstalled,
}

/// Configuration shared by every case of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Base URL all request paths are joined to.
    pub base_url: String,
    /// Default per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Path of the JSON test-data fixture.
    pub fixtures_path: PathBuf,
    /// Deadline for the whole run; in-flight cases are cancelled when it passes.
    pub suite_timeout_ms: Option<u64>,
    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fixtures_path: PathBuf::from(DEFAULT_FIXTURES_PATH),
            suite_timeout_ms: None,
            report_path: None,
        }
    }
}

impl RunConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout variable is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.timeout_ms = parse_millis(ENV_TIMEOUT_MS, &raw)?;
        }
        if let Some(path) = lookup(ENV_FIXTURES).filter(|v| !v.trim().is_empty()) {
            config.fixtures_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_SUITE_TIMEOUT_MS) {
            config.suite_timeout_ms = Some(parse_millis(ENV_SUITE_TIMEOUT_MS, &raw)?);
        }
        if let Some(path) = lookup(ENV_REPORT).filter(|v| !v.trim().is_empty()) {
            config.report_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the default request timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Installs this configuration for the rest of the process.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyInstalled`] if a configuration was installed before.
    pub fn install(self) -> Result<&'static Self, ConfigError> {
        GLOBAL.set(self).map_err(|_| ConfigError::AlreadyInstalled)?;
        GLOBAL.get().ok_or(ConfigError::AlreadyInstalled)
    }

    /// Returns the installed configuration, if any.
    #[must_use]
    pub fn global() -> Option<&'static Self> {
        GLOBAL.get()
    }

    /// Starts a request seeded with this run's base URL and timeout.
    #[must_use]
    pub fn request(&self, method: HttpMethod, path: &str) -> RequestSpecBuilder {
        RequestSpec::builder(self.base_url.clone())
            .method(method)
            .path(path)
            .timeout_ms(self.timeout_ms)
    }
}

fn parse_millis(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
        reason,
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be greater than zero")),
        Ok(value) => Ok(value),
        Err(_) => Err(invalid("not a whole number of milliseconds")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RunConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.base_url, "https://reqres.in/api");
        assert_eq!(config.timeout_ms, 30_000);
        assert_eq!(config.suite_timeout_ms, None);
        assert_eq!(config.report_path, None);
    }

    #[test]
    fn test_overrides() {
        let config = RunConfig::from_lookup(lookup(&[
            ("CONTRACT_BASE_URL", "http://127.0.0.1:8080/api"),
            ("CONTRACT_TIMEOUT_MS", "1500"),
            ("CONTRACT_FIXTURES", "/tmp/data.json"),
            ("CONTRACT_SUITE_TIMEOUT_MS", "60000"),
            ("CONTRACT_REPORT", "target/report.json"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080/api");
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.fixtures_path, PathBuf::from("/tmp/data.json"));
        assert_eq!(config.suite_timeout_ms, Some(60_000));
        assert_eq!(config.report_path, Some(PathBuf::from("target/report.json")));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let result = RunConfig::from_lookup(lookup(&[("CONTRACT_TIMEOUT_MS", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "CONTRACT_TIMEOUT_MS",
                ..
            })
        ));
    }

    #[test]
    fn test_non_numeric_timeout_is_rejected() {
        let result = RunConfig::from_lookup(lookup(&[("CONTRACT_SUITE_TIMEOUT_MS", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_request_uses_run_defaults() {
        let config = RunConfig::default()
            .with_base_url("http://localhost:9000/api")
            .with_timeout_ms(250);
        let spec = config.request(HttpMethod::Get, "/users?page=2").build().unwrap();

        assert_eq!(spec.full_url().as_str(), "http://localhost:9000/api/users?page=2");
        assert_eq!(spec.timeout_ms(), 250);
    }

    #[test]
    fn test_install_only_once() {
        let first = RunConfig::default().with_timeout_ms(1234).install();
        assert!(first.is_ok());
        assert_eq!(RunConfig::global().map(|c| c.timeout_ms), Some(1234));

        let second = RunConfig::default().install();
        assert_eq!(second, Err(ConfigError::AlreadyInstalled));
        assert_eq!(RunConfig::global().map(|c| c.timeout_ms), Some(1234));
    }
}
