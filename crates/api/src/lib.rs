//! # Ribbonline API
//!
//! Client for the remote parcel-data API: one authenticated GET returning a
//! GeoJSON FeatureCollection of land-parcel/building polygons, with an
//! optional gzip-compressed response mode. Credentials come from a JSON
//! configuration file. A non-success response is fatal for the whole run;
//! there is no partial output.

mod blocking;
mod client;
mod config;
mod error;

pub use blocking::ApiClientBlocking;
pub use client::{
    ApiClient, ApiClientOptions, AreasQuery, ExportFormat, DEFAULT_CLASSIFICATION_CODES,
};
pub use config::ApiConfig;
pub use error::{ApiError, Result};
