//! # Ribbonline Core
//!
//! Core types and I/O for the ribbonline centreline-width toolkit.
//!
//! This crate provides:
//! - `Feature` / `FeatureCollection`: polygon records with attributes
//! - `LinearGeometry`: the single-part / multi-part skeleton variant
//! - `Crs`: coordinate reference system carried through to output layers
//! - GeoJSON reading and writing

pub mod crs;
pub mod error;
pub mod io;
pub mod linear;
pub mod vector;

pub use crs::Crs;
pub use error::{Error, Result};
pub use linear::LinearGeometry;
pub use vector::{AttributeValue, Feature, FeatureCollection};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::linear::LinearGeometry;
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection};
}
