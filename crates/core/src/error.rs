//! Error types for ribbonline

use thiserror::Error;

/// Main error type for ribbonline operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    #[error("unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ribbonline operations
pub type Result<T> = std::result::Result<T, Error>;
