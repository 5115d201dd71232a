//! Coordinate Reference System handling
//!
//! Output layers carry the CRS of the input collection unchanged; no
//! reprojection happens anywhere in the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System, stored in the GeoJSON "name" form
/// (e.g. `urn:ogc:def:crs:EPSG::27700`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs {
    name: String,
}

impl Crs {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            name: format!("urn:ogc:def:crs:EPSG::{}", code),
        }
    }

    /// Create a CRS from a GeoJSON crs name string
    pub fn from_name(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// British National Grid (EPSG:27700), the CRS of the MasterMap source data
    pub fn british_national_grid() -> Self {
        Self::from_epsg(27700)
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// The crs name string
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the EPSG code if the name carries one
    pub fn epsg(&self) -> Option<u32> {
        self.name
            .rsplit(|c| c == ':' || c == '/')
            .next()
            .and_then(|tail| tail.parse().ok())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
