//! The reqres.in contract suite.
//!
//! One parameterized suite covering listing, lookup, creation, update,
//! deletion, status passthrough and failed login.

use contract_application::RunConfig;
use contract_domain::{ContractCase, DomainResult, HttpMethod};
use serde_json::json;

use crate::fixtures::ReqresFixtures;

/// Group of the read-only user endpoints.
pub const GROUP_USERS_GET: &str = "users (GET)";
/// Group of the user creation endpoint.
pub const GROUP_USERS_POST: &str = "users (POST)";
/// Group of the user update endpoint.
pub const GROUP_USERS_PUT: &str = "users (PUT)";
/// Group of the user deletion endpoint.
pub const GROUP_USERS_DELETE: &str = "users (DELETE)";
/// Group of the resource listing.
pub const GROUP_RESOURCES: &str = "resources";
/// Group of the status passthrough endpoint.
pub const GROUP_STATUS: &str = "status codes";
/// Group of the login endpoint.
pub const GROUP_LOGIN: &str = "login";

const PAGES: [u64; 2] = [2, 3];
const USER_IDS: [u64; 2] = [2, 4];
const UPDATED_USER_ID: u64 = 2;
const STATUS_CODES: [u16; 2] = [400, 200];

/// Builds the reqres suite against `config`'s base URL and timeout.
///
/// # Errors
///
/// Returns an error if a request cannot be built from the configuration.
pub fn reqres_suite(config: &RunConfig, fixtures: &ReqresFixtures) -> DomainResult<Vec<ContractCase>> {
    let mut cases = Vec::new();

    for page in PAGES {
        let request = config
            .request(HttpMethod::Get, "/users")
            .query("page", page.to_string())
            .build()?;
        cases.push(
            ContractCase::new(GROUP_USERS_GET, format!("GET /users?page={page} lists the page"), request)
                .expect_status(200)
                .expect_json_like(json!({ "page": page })),
        );
    }

    for id in USER_IDS {
        let request = config.request(HttpMethod::Get, &format!("/users/{id}")).build()?;
        cases.push(
            ContractCase::new(GROUP_USERS_GET, format!("GET /users/{id} returns user {id}"), request)
                .expect_status(200)
                .expect_json_like(json!({ "data": { "id": id } })),
        );
    }

    cases.push(
        ContractCase::new(
            GROUP_RESOURCES,
            "GET /unknown lists resources",
            config.request(HttpMethod::Get, "/unknown").build()?,
        )
        .expect_status(200),
    );

    for code in STATUS_CODES {
        let request = config
            .request(HttpMethod::Get, &format!("/status/{code}"))
            .build()?;
        cases.push(
            ContractCase::new(GROUP_STATUS, format!("GET /status/{code} answers {code}"), request)
                .expect_status(code),
        );
    }

    let new_user = fixtures.new_user.to_json();
    cases.push(
        ContractCase::new(
            GROUP_USERS_POST,
            "POST /users creates a user",
            config
                .request(HttpMethod::Post, "/users")
                .json(new_user.clone())
                .build()?,
        )
        .expect_status(201)
        .expect_json_like(new_user)
        .expect_body_matches("createdAt"),
    );

    let update_user = fixtures.update_user.to_json();
    cases.push(
        ContractCase::new(
            GROUP_USERS_PUT,
            format!("PUT /users/{UPDATED_USER_ID} updates the user"),
            config
                .request(HttpMethod::Put, &format!("/users/{UPDATED_USER_ID}"))
                .json(update_user.clone())
                .build()?,
        )
        .expect_status(200)
        .expect_json_like(update_user)
        .expect_body_matches("updatedAt"),
    );

    for id in USER_IDS {
        let request = config
            .request(HttpMethod::Delete, &format!("/users/{id}"))
            .build()?;
        cases.push(
            ContractCase::new(GROUP_USERS_DELETE, format!("DELETE /users/{id} returns no content"), request)
                .expect_status(204)
                .expect_empty_body(),
        );
    }

    cases.push(
        ContractCase::new(
            GROUP_LOGIN,
            "POST /login without password is rejected",
            config
                .request(HttpMethod::Post, "/login")
                .json(json!({ "email": "peter@klaven" }))
                .build()?,
        )
        .expect_status(400),
    );

    Ok(cases)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::UserPayload;
    use contract_domain::{DomainError, Expectation};
    use pretty_assertions::assert_eq;

    fn fixtures() -> ReqresFixtures {
        ReqresFixtures {
            new_user: UserPayload {
                name: "morpheus".to_string(),
                job: "leader".to_string(),
            },
            update_user: UserPayload {
                name: "morpheus".to_string(),
                job: "zion resident".to_string(),
            },
        }
    }

    fn find<'a>(cases: &'a [ContractCase], name: &str) -> &'a ContractCase {
        cases.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn test_suite_shape() {
        let cases = reqres_suite(&RunConfig::default(), &fixtures()).unwrap();

        assert_eq!(cases.len(), 11);
        let groups: Vec<&str> = cases.iter().map(|c| c.group.as_str()).collect();
        assert_eq!(groups.iter().filter(|g| **g == GROUP_USERS_GET).count(), 4);
        assert_eq!(groups.iter().filter(|g| **g == GROUP_USERS_DELETE).count(), 2);
        assert!(cases.iter().all(|c| !c.expectations.is_empty()));
    }

    #[test]
    fn test_list_case_uses_query_and_config() {
        let config = RunConfig::default()
            .with_base_url("http://127.0.0.1:9999/api")
            .with_timeout_ms(500);
        let cases = reqres_suite(&config, &fixtures()).unwrap();
        let case = find(&cases, "GET /users?page=2 lists the page");

        assert_eq!(
            case.request.full_url().as_str(),
            "http://127.0.0.1:9999/api/users?page=2"
        );
        assert_eq!(case.request.timeout_ms(), 500);
        assert_eq!(
            case.expectations,
            vec![
                Expectation::ExactStatus { code: 200 },
                Expectation::JsonSubsetMatch {
                    subset: json!({"page": 2})
                },
            ]
        );
    }

    #[test]
    fn test_create_case_sends_fixture() {
        let cases = reqres_suite(&RunConfig::default(), &fixtures()).unwrap();
        let case = find(&cases, "POST /users creates a user");

        assert_eq!(case.request.method(), HttpMethod::Post);
        assert_eq!(
            case.request.json_body(),
            Some(&json!({"name": "morpheus", "job": "leader"}))
        );
        assert_eq!(
            case.expectations.last(),
            Some(&Expectation::BodyRegexMatch {
                pattern: "createdAt".to_string()
            })
        );
    }

    #[test]
    fn test_delete_cases_expect_empty_body() {
        let cases = reqres_suite(&RunConfig::default(), &fixtures()).unwrap();
        let deletes: Vec<_> = cases
            .iter()
            .filter(|c| c.request.method() == HttpMethod::Delete)
            .collect();

        assert_eq!(deletes.len(), 2);
        assert!(
            deletes
                .iter()
                .all(|c| c.expectations.contains(&Expectation::EmptyBody))
        );
    }

    #[test]
    fn test_bad_base_url_is_reported() {
        let config = RunConfig::default().with_base_url("ftp://example.com");
        let result = reqres_suite(&config, &fixtures());
        assert!(matches!(result, Err(DomainError::InvalidUrl(_))));
    }
}
