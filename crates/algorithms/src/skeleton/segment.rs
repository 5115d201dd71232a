//! Decomposition of a skeleton into atomic two-point segments

use geo::Line;
use ribbonline_core::LinearGeometry;

/// Split every skeleton part into its consecutive-coordinate segments.
///
/// A part with n coordinates yields n - 1 segments in original vertex
/// order; parts with fewer than two coordinates yield nothing. The result
/// is flat across parts.
pub fn segments(skeleton: &LinearGeometry) -> Vec<Line<f64>> {
    skeleton
        .parts()
        .iter()
        .flat_map(|part| part.0.windows(2).map(|w| Line::new(w[0], w[1])))
        .collect()
}
