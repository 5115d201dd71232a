//! The per-collection processing pipeline
//!
//! Runs each stage across the whole collection before moving to the next,
//! reporting progress at every stage boundary. Stages are pure per-feature
//! transforms with no shared state, so each stage map fans out across
//! features when the `parallel` feature is enabled. A feature that fails
//! skeletonization (or carries no polygon) is skipped with a warning and
//! never aborts the run.

use crate::maybe_rayon::*;
use crate::skeleton::{
    merge, prune, segments, simplify, SkeletonError, Skeletonizer, VoronoiSkeletonizer,
    DEFAULT_INTERPOLATION_DISTANCE, DEFAULT_PRUNE_THRESHOLD, DEFAULT_SIMPLIFY_TOLERANCE,
    RETRY_INTERPOLATION_DISTANCE,
};
use crate::width::{
    average_distances, centreline_feature, ribbon_features, BufferParams, SegmentWidths,
    DEFAULT_SAMPLE_STEP,
};
use ribbonline_core::{Feature, FeatureCollection, LinearGeometry};
use tracing::{info, warn};

/// Parameters controlling the whole pipeline
#[derive(Debug, Clone)]
pub struct PipelineParams {
    /// Boundary sampling distance for the first skeletonization attempt
    pub interpolation_distance: f64,
    /// Finer sampling distance used for the single retry
    pub retry_interpolation_distance: f64,
    /// Dead-end parts at or below this length are pruned
    pub prune_threshold: f64,
    /// Topology-preserving simplification tolerance
    pub simplify_tolerance: f64,
    /// Spacing of width sample points along each segment
    pub sample_step: f64,
    /// Capsule approximation used when buffering ribbons
    pub buffer: BufferParams,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            interpolation_distance: DEFAULT_INTERPOLATION_DISTANCE,
            retry_interpolation_distance: RETRY_INTERPOLATION_DISTANCE,
            prune_threshold: DEFAULT_PRUNE_THRESHOLD,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            sample_step: DEFAULT_SAMPLE_STEP,
            buffer: BufferParams::default(),
        }
    }
}

/// Process a feature collection into the (ribbons, centrelines) layer pair.
///
/// Both output collections carry the input collection's CRS. Ribbons hold
/// one row per segment across all features; centrelines hold one row per
/// surviving feature.
pub fn process(
    collection: &FeatureCollection,
    params: &PipelineParams,
) -> (FeatureCollection, FeatureCollection) {
    let features = collection.features.as_slice();
    info!("processing {} features", features.len());

    let skeletons: Vec<Option<LinearGeometry>> = features
        .into_par_iter()
        .map(|feature| feature_skeleton(feature, params))
        .collect();
    info!("centrelines generated");

    let skeletons: Vec<Option<LinearGeometry>> = skeletons
        .into_par_iter()
        .map(|s| s.map(merge))
        .collect();
    info!("parts merged");

    let skeletons: Vec<Option<LinearGeometry>> = skeletons
        .into_par_iter()
        .map(|s| s.map(|s| prune(s, params.prune_threshold)))
        .collect();
    info!("short dead ends removed");

    let skeletons: Vec<Option<LinearGeometry>> = skeletons
        .into_par_iter()
        .map(|s| s.map(|s| simplify(s, params.simplify_tolerance)))
        .collect();
    info!("skeletons simplified");

    let records: Vec<Option<SegmentWidths>> = (0..features.len())
        .into_par_iter()
        .map(|i| {
            let skeleton = skeletons[i].as_ref()?;
            let polygon = features[i].polygon()?;
            let segs = segments(skeleton);
            let widths = average_distances(polygon, &segs, params.sample_step);
            Some(SegmentWidths {
                segments: segs,
                widths,
            })
        })
        .collect();
    info!("average widths computed");

    let mut ribbons = FeatureCollection::with_crs(collection.crs.clone());
    let mut centrelines = FeatureCollection::with_crs(collection.crs.clone());

    for record in records.iter().flatten() {
        for row in ribbon_features(record, &params.buffer) {
            ribbons.push(row);
        }
        if let Some(row) = centreline_feature(record) {
            centrelines.push(row);
        }
    }
    info!(
        "layers reconstructed: {} ribbon rows, {} centreline rows",
        ribbons.len(),
        centrelines.len()
    );

    (ribbons, centrelines)
}

/// Skeletonize one feature's polygon, retrying once with the finer
/// interpolation distance before giving up on the feature.
fn feature_skeleton(feature: &Feature, params: &PipelineParams) -> Option<LinearGeometry> {
    let Some(polygon) = feature.polygon() else {
        warn!(id = feature.id.as_deref(), "feature has no polygon geometry; skipped");
        return None;
    };

    let skeletonizer = VoronoiSkeletonizer;
    let mut last_error: Option<SkeletonError> = None;

    for distance in [
        params.interpolation_distance,
        params.retry_interpolation_distance,
    ] {
        match skeletonizer.skeletonize(polygon, distance) {
            Ok(skeleton) => return Some(skeleton),
            Err(e) => last_error = Some(e),
        }
    }

    if let Some(error) = last_error {
        warn!(
            id = feature.id.as_deref(),
            %error,
            "skeletonization failed after retry; feature skipped"
        );
    }
    None
}
