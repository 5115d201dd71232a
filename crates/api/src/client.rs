//! Async client for the parcel-data areas endpoint.
//!
//! A thin wrapper over one authenticated GET: the areas export with a
//! GeoJSON (optionally gzip-compressed) body. A non-success status is fatal
//! for the whole run, so it maps to an error rather than a retry.

use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::{ApiError, Result};
use ribbonline_core::io::collection_from_str;
use ribbonline_core::FeatureCollection;

/// Classification codes requested by default (land-parcel themes).
pub const DEFAULT_CLASSIFICATION_CODES: &str = "10123, 10172, 10183";

/// Response body encoding for the areas export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    GeoJson,
    /// Gzip-compressed GeoJSON, decompressed client-side.
    GeoJsonGz,
}

impl ExportFormat {
    fn as_param(self) -> &'static str {
        match self {
            Self::GeoJson => "geojson",
            Self::GeoJsonGz => "geojson-gz",
        }
    }
}

/// Query for the areas endpoint.
#[derive(Debug, Clone)]
pub struct AreasQuery {
    /// Area aggregation scale (e.g. `"oa"`, `"lad"`)
    pub scale: String,
    /// Comma-separated area codes
    pub area_codes: String,
    /// Comma-separated classification codes
    pub classification_codes: String,
    pub export_format: ExportFormat,
}

impl AreasQuery {
    pub fn new() -> Self {
        Self {
            scale: "oa".to_string(),
            area_codes: "E00042673".to_string(),
            classification_codes: DEFAULT_CLASSIFICATION_CODES.to_string(),
            export_format: ExportFormat::GeoJson,
        }
    }

    pub fn scale(mut self, scale: &str) -> Self {
        self.scale = scale.to_string();
        self
    }

    pub fn area_codes(mut self, codes: &str) -> Self {
        self.area_codes = codes.to_string();
        self
    }

    pub fn classification_codes(mut self, codes: &str) -> Self {
        self.classification_codes = codes.to_string();
        self
    }

    pub fn export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }
}

impl Default for AreasQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiClientOptions {
    /// Per-request timeout (default 30 s)
    pub request_timeout: Duration,
}

impl Default for ApiClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Async client for the parcel-data API.
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Create a new client.
    pub fn new(config: ApiConfig, options: ApiClientOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(options.request_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Fetch the areas export as GeoJSON text.
    pub async fn fetch_areas_text(&self, query: &AreasQuery) -> Result<String> {
        let url = format!(
            "{}/data/mastermap/areas",
            self.config.url.trim_end_matches('/')
        );

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("export_format", query.export_format.as_param()),
                ("scale", query.scale.as_str()),
                ("area_codes", query.area_codes.as_str()),
                ("classification_codes", query.classification_codes.as_str()),
            ])
            .basic_auth(&self.config.username, Some(&self.config.password))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = resp.bytes().await?;
        match query.export_format {
            ExportFormat::GeoJson => String::from_utf8(bytes.to_vec())
                .map_err(|e| ApiError::Body(e.to_string())),
            ExportFormat::GeoJsonGz => decode_gzip(&bytes),
        }
    }

    /// Fetch the areas export and parse it into a feature collection.
    pub async fn fetch_areas(&self, query: &AreasQuery) -> Result<FeatureCollection> {
        let text = self.fetch_areas_text(query).await?;
        Ok(collection_from_str(&text)?)
    }
}

fn decode_gzip(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut out = String::new();
    GzDecoder::new(bytes)
        .read_to_string(&mut out)
        .map_err(|e| ApiError::Decompress(e.to_string()))?;
    Ok(out)
}
