//! Topology-preserving skeleton simplification

use geo::{MultiLineString, SimplifyVwPreserve};
use ribbonline_core::LinearGeometry;

/// Default simplification tolerance in coordinate units.
pub const DEFAULT_SIMPLIFY_TOLERANCE: f64 = 1.0;

/// Reduce vertex density of every skeleton part.
///
/// Uses the topology-preserving Visvalingam-Whyatt variant, so no
/// self-intersections are introduced and part connectivity is unchanged.
/// Deterministic for a given input.
pub fn simplify(skeleton: LinearGeometry, tolerance: f64) -> LinearGeometry {
    match skeleton {
        LinearGeometry::Single(ls) => {
            LinearGeometry::Single(ls.simplify_vw_preserve(&tolerance))
        }
        LinearGeometry::Multi(mls) => LinearGeometry::Multi(MultiLineString::new(
            mls.0
                .iter()
                .map(|ls| ls.simplify_vw_preserve(&tolerance))
                .collect(),
        )),
    }
}
