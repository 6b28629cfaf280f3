//! Test-data fixture loading.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::serialization::{SerializationError, from_json_bytes};

/// Errors raised while loading a fixture.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read fixture {path}: {source}")]
    Io {
        /// Fixture path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the requested type.
    #[error("failed to parse fixture {path}: {source}")]
    Parse {
        /// Fixture path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: SerializationError,
    },
}

/// Reads and deserializes a JSON fixture.
///
/// Fixtures are loaded once per run and treated as read-only afterwards.
///
/// # Errors
///
/// Returns [`FixtureError`] if the file cannot be read or parsed.
pub async fn load_fixture<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, FixtureError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|source| FixtureError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let fixture = from_json_bytes(&bytes).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "fixture loaded");
    Ok(fixture)
}
