//! Blocking (synchronous) API for callers without an async runtime.
//!
//! Wraps the async [`ApiClient`] with an internal current-thread Tokio
//! runtime so the CLI doesn't need to manage one.

use crate::client::{ApiClient, ApiClientOptions, AreasQuery};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use ribbonline_core::FeatureCollection;

/// Blocking wrapper around [`ApiClient`].
pub struct ApiClientBlocking {
    rt: tokio::runtime::Runtime,
    inner: ApiClient,
}

impl ApiClientBlocking {
    /// Create a blocking client.
    pub fn new(config: ApiConfig, options: ApiClientOptions) -> Result<Self> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::Runtime(e.to_string()))?;

        let inner = ApiClient::new(config, options)?;

        Ok(Self { rt, inner })
    }

    /// Fetch the areas export as GeoJSON text (blocking).
    pub fn fetch_areas_text(&self, query: &AreasQuery) -> Result<String> {
        self.rt.block_on(self.inner.fetch_areas_text(query))
    }

    /// Fetch and parse the areas export (blocking).
    pub fn fetch_areas(&self, query: &AreasQuery) -> Result<FeatureCollection> {
        self.rt.block_on(self.inner.fetch_areas(query))
    }
}
