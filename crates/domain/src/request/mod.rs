//! HTTP Request domain types

mod method;
mod query;
mod spec;

pub use method::HttpMethod;
pub use query::QueryParams;
pub use spec::{DEFAULT_TIMEOUT_MS, RequestSpec, RequestSpecBuilder};
