//! API credentials loaded from an external configuration file.

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Connection details for the parcel-data API: base URL plus basic-auth
/// credentials, stored in a small JSON file kept out of version control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the API, without a trailing slash
    pub url: String,
    pub username: String,
    pub password: String,
}

impl ApiConfig {
    /// Load the configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::Config(format!("{}: {}", path.display(), e)))
    }
}
