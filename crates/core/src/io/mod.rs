//! I/O operations for reading and writing geospatial data

pub mod geojson;

pub use geojson::{collection_from_str, collection_to_string};

use crate::error::Result;
use crate::vector::FeatureCollection;
use std::fs;
use std::path::Path;

/// Read a GeoJSON file into a [`FeatureCollection`].
pub fn read_geojson<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let text = fs::read_to_string(path)?;
    geojson::collection_from_str(&text)
}

/// Write a [`FeatureCollection`] to a GeoJSON file.
pub fn write_geojson<P: AsRef<Path>>(fc: &FeatureCollection, path: P) -> Result<()> {
    let text = geojson::collection_to_string(fc)?;
    fs::write(path, text)?;
    Ok(())
}
