//! Skeleton construction and cleaning
//!
//! Stages in pipeline order:
//! - Voronoi-dual extraction of a raw skeleton from a polygon
//! - Merge: coalesce parts at shared endpoints
//! - Prune: drop short dead-end spurs
//! - Simplify: topology-preserving vertex reduction
//! - Segment: explode into atomic two-point edges

mod merge;
mod prune;
mod segment;
mod simplify;
mod voronoi;

pub use merge::merge;
pub use prune::{prune, DEFAULT_PRUNE_THRESHOLD};
pub use segment::segments;
pub use simplify::{simplify, DEFAULT_SIMPLIFY_TOLERANCE};
pub use voronoi::{
    SkeletonError, Skeletonizer, VoronoiSkeletonizer, DEFAULT_INTERPOLATION_DISTANCE,
    RETRY_INTERPOLATION_DISTANCE,
};
