//! Request specification type

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::{HttpMethod, QueryParams};
use crate::error::{DomainError, DomainResult};

/// Timeout applied when a builder is not given one explicitly.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Complete, immutable specification for one HTTP call.
///
/// Instances are only produced by [`RequestSpecBuilder::build`] or by
/// deserialization, and both apply the same checks. Fields are read
/// through accessors so a spec cannot change between construction and
/// dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRequestSpec")]
pub struct RequestSpec {
    method: HttpMethod,
    url: Url,
    #[serde(default)]
    query: QueryParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    json_body: Option<Value>,
    timeout_ms: u64,
}

impl RequestSpec {
    /// Starts building a request against the given base URL.
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> RequestSpecBuilder {
        RequestSpecBuilder::new(base_url)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Target URL without query parameters.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Query parameters.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// JSON payload, if any.
    #[must_use]
    pub const fn json_body(&self) -> Option<&Value> {
        self.json_body.as_ref()
    }

    /// Timeout for the whole call in milliseconds.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Returns the URL with the query parameters encoded.
    #[must_use]
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(self.query.iter());
        }
        url
    }
}

/// Unchecked wire form of a [`RequestSpec`].
#[derive(Deserialize)]
struct RawRequestSpec {
    method: HttpMethod,
    url: Url,
    #[serde(default)]
    query: QueryParams,
    #[serde(default)]
    json_body: Option<Value>,
    timeout_ms: u64,
}

impl TryFrom<RawRequestSpec> for RequestSpec {
    type Error = DomainError;

    fn try_from(raw: RawRequestSpec) -> DomainResult<Self> {
        check_scheme(&raw.url)?;
        check_timeout(raw.timeout_ms)?;
        Ok(Self {
            method: raw.method,
            url: raw.url,
            query: raw.query,
            json_body: raw.json_body,
            timeout_ms: raw.timeout_ms,
        })
    }
}

fn check_scheme(url: &Url) -> DomainResult<()> {
    if matches!(url.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(DomainError::InvalidUrl(format!(
            "URL must start with http:// or https://: {url}"
        )))
    }
}

const fn check_timeout(timeout_ms: u64) -> DomainResult<()> {
    if timeout_ms == 0 {
        Err(DomainError::InvalidTimeout(timeout_ms))
    } else {
        Ok(())
    }
}

/// Builder for [`RequestSpec`].
///
/// ```
/// use contract_domain::request::{HttpMethod, RequestSpec};
///
/// let spec = RequestSpec::builder("https://reqres.in/api")
///     .get("/users?page=2")
///     .build()
///     .unwrap();
///
/// assert_eq!(spec.method(), HttpMethod::Get);
/// assert_eq!(spec.full_url().as_str(), "https://reqres.in/api/users?page=2");
/// ```
#[derive(Debug, Clone)]
pub struct RequestSpecBuilder {
    base_url: String,
    method: String,
    path: String,
    query: QueryParams,
    json_body: Option<Value>,
    timeout_ms: u64,
}

impl RequestSpecBuilder {
    /// Creates a builder for a GET request against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            method: HttpMethod::Get.as_str().to_string(),
            path: String::new(),
            query: QueryParams::new(),
            json_body: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: HttpMethod) -> Self {
        method.as_str().clone_into(&mut self.method);
        self
    }

    /// Sets the HTTP method by name; unknown names are rejected by [`Self::build`].
    #[must_use]
    pub fn method_name(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Sets the path appended to the base URL.
    ///
    /// A query string in the path (`/users?page=2`) is moved into the
    /// query parameters.
    #[must_use]
    pub fn path(mut self, path: &str) -> Self {
        match path.split_once('?') {
            Some((path, query)) => {
                self.path = path.to_string();
                self.query.extend_from_query(query);
            }
            None => self.path = path.to_string(),
        }
        self
    }

    /// Shortcut for `method(HttpMethod::Get).path(path)`.
    #[must_use]
    pub fn get(self, path: &str) -> Self {
        self.method(HttpMethod::Get).path(path)
    }

    /// Shortcut for `method(HttpMethod::Post).path(path)`.
    #[must_use]
    pub fn post(self, path: &str) -> Self {
        self.method(HttpMethod::Post).path(path)
    }

    /// Shortcut for `method(HttpMethod::Put).path(path)`.
    #[must_use]
    pub fn put(self, path: &str) -> Self {
        self.method(HttpMethod::Put).path(path)
    }

    /// Shortcut for `method(HttpMethod::Delete).path(path)`.
    #[must_use]
    pub fn delete(self, path: &str) -> Self {
        self.method(HttpMethod::Delete).path(path)
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Sets the JSON payload.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }

    /// Sets the timeout in milliseconds.
    #[must_use]
    pub const fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Validates the inputs and produces the immutable spec.
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmptyUrl`] if the base URL is blank
    /// - [`DomainError::UnsupportedMethod`] if the method name is unknown
    /// - [`DomainError::InvalidUrl`] if the joined URL is not an absolute http(s) URL
    /// - [`DomainError::InvalidTimeout`] if the timeout is zero
    pub fn build(self) -> DomainResult<RequestSpec> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(DomainError::EmptyUrl);
        }

        let method: HttpMethod = self.method.parse()?;

        let joined = join_url(base, &self.path);
        let url = Url::parse(&joined).map_err(|e| DomainError::InvalidUrl(format!("{e}: {joined}")))?;
        check_scheme(&url)?;
        check_timeout(self.timeout_ms)?;

        Ok(RequestSpec {
            method,
            url,
            query: self.query,
            json_body: self.json_body,
            timeout_ms: self.timeout_ms,
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
