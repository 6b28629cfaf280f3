//! Reqres test data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Name and job of a user, as sent to `/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    /// User name.
    pub name: String,
    /// Job title.
    pub job: String,
}

impl UserPayload {
    /// Returns the payload as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({ "name": self.name, "job": self.job })
    }
}

/// Contents of `reqres.data.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReqresFixtures {
    /// Payload for `POST /users`.
    pub new_user: UserPayload,
    /// Payload for `PUT /users/{id}`.
    pub update_user: UserPayload,
}

const WORKSPACE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../..");

/// Locates a fixture file.
///
/// Absolute paths and paths that exist relative to the working directory
/// are used as given. Other relative paths are tried against the workspace
/// root, so the default `crates/app/data/...` path works from any directory.
#[must_use]
pub fn resolve_fixtures_path(path: &Path) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }
    let from_root = Path::new(WORKSPACE_ROOT).join(path);
    if from_root.exists() {
        from_root
    } else {
        path.to_path_buf()
    }
}
