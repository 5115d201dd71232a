//! Error types for the parcel-data API client.

use thiserror::Error;

/// Errors produced by the API client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("decompression failed: {0}")]
    Decompress(String),

    #[error("invalid response body: {0}")]
    Body(String),

    #[error("runtime error: {0}")]
    Runtime(String),

    #[error("core error: {0}")]
    Core(#[from] ribbonline_core::Error),
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
