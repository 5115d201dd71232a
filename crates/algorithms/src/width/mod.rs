//! Per-segment width estimation
//!
//! For every segment of a feature's skeleton, points are sampled along the
//! segment at a fixed step, the shortest distance from each sample to the
//! polygon boundary (exterior ring plus holes) is measured by nearest-point
//! projection, and the distances are averaged into one width value. The
//! width value is a one-sided distance; reconstruction doubles it when
//! reporting the full cross-section.

mod reconstruct;

pub use reconstruct::{
    buffer_segment, centreline_feature, ribbon_features, BufferParams,
};

use geo::{Closest, ClosestPoint, Distance, Euclidean, Line, MultiLineString, Point, Polygon};
use tracing::warn;

/// Default spacing between sample points, in coordinate units.
pub const DEFAULT_SAMPLE_STEP: f64 = 1.0;

/// A feature's segments paired 1:1 with their estimated widths.
///
/// Widths here are the averaged one-sided boundary distances, not the
/// doubled cross-section values written to the output layers.
#[derive(Debug, Clone, Default)]
pub struct SegmentWidths {
    pub segments: Vec<Line<f64>>,
    pub widths: Vec<f64>,
}

/// The polygon boundary as a linear geometry: exterior ring plus every hole.
pub fn polygon_boundary(polygon: &Polygon<f64>) -> MultiLineString<f64> {
    let mut rings = vec![polygon.exterior().clone()];
    rings.extend(polygon.interiors().iter().cloned());
    MultiLineString::new(rings)
}

/// Sample points along a segment at the given step.
///
/// The sample count is `round(length / step) + 1`. A count of one (a very
/// short or zero-length segment) yields the midpoint; otherwise points sit
/// at multiples of the step from the start, clamped to the segment so the
/// final sample never overshoots the end.
pub fn sample_points(segment: &Line<f64>, step: f64) -> Vec<Point<f64>> {
    let start = segment.start_point();
    let end = segment.end_point();
    let length = Euclidean.distance(start, end);

    let count = (length / step).round() as usize + 1;
    if count == 1 {
        return vec![Point::new(
            (segment.start.x + segment.end.x) / 2.0,
            (segment.start.y + segment.end.y) / 2.0,
        )];
    }

    (0..count)
        .map(|i| {
            let t = ((step * i as f64) / length).min(1.0);
            Point::new(
                segment.start.x + (segment.end.x - segment.start.x) * t,
                segment.start.y + (segment.end.y - segment.start.y) * t,
            )
        })
        .collect()
}

/// Shortest distance from a point to the boundary by nearest-point
/// projection. `None` when the boundary is empty.
fn boundary_distance(boundary: &MultiLineString<f64>, point: Point<f64>) -> Option<f64> {
    boundary
        .0
        .iter()
        .filter_map(|ring| match ring.closest_point(&point) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => {
                Some(Euclidean.distance(point, p))
            }
            Closest::Indeterminate => None,
        })
        .min_by(|a, b| a.total_cmp(b))
}

/// One averaged boundary distance per segment.
///
/// A segment that produces no usable distance (degenerate boundary) gets
/// width 0 rather than a division fault.
pub fn average_distances(
    polygon: &Polygon<f64>,
    segments: &[Line<f64>],
    step: f64,
) -> Vec<f64> {
    let boundary = polygon_boundary(polygon);

    segments
        .iter()
        .map(|segment| {
            let distances: Vec<f64> = sample_points(segment, step)
                .into_iter()
                .filter_map(|p| boundary_distance(&boundary, p))
                .collect();

            if distances.is_empty() {
                warn!("segment produced no boundary distances; width set to 0");
                0.0
            } else {
                distances.iter().sum::<f64>() / distances.len() as f64
            }
        })
        .collect()
}
