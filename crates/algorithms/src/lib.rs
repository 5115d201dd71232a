//! # Ribbonline Algorithms
//!
//! Centreline extraction and width estimation for polygonal parcel and
//! building geometry.
//!
//! ## Pipeline stages
//!
//! - **skeleton**: Voronoi-dual extraction, merging, dead-end pruning,
//!   topology-preserving simplification, segmentation
//! - **width**: boundary-distance sampling, per-segment averaging, ribbon
//!   and centreline reconstruction
//! - **pipeline**: the stage-ordered `process` entry point over a whole
//!   feature collection

mod maybe_rayon;

pub mod pipeline;
pub mod skeleton;
pub mod width;

pub use pipeline::{process, PipelineParams};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::pipeline::{process, PipelineParams};
    pub use crate::skeleton::{
        merge, prune, segments, simplify, SkeletonError, Skeletonizer, VoronoiSkeletonizer,
    };
    pub use crate::width::{
        average_distances, buffer_segment, polygon_boundary, sample_points, BufferParams,
        SegmentWidths,
    };
    pub use ribbonline_core::prelude::*;
}
