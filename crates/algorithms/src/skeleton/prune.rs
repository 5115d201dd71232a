//! Removal of short dead-end spurs
//!
//! Skeletonization of noisy parcel outlines leaves spurs running into every
//! boundary concavity. A part is a dead end when either endpoint touches no
//! other part; short dead ends are construction artifacts and are dropped,
//! long ones are kept because they usually trace real protrusions such as
//! building wings.

use geo::line_measures::LengthMeasurable;
use geo::{Euclidean, Intersects, MultiLineString, Point};
use ribbonline_core::LinearGeometry;

/// Dead-end parts at or below this length are removed.
pub const DEFAULT_PRUNE_THRESHOLD: f64 = 5.0;

/// Drop dead-end parts no longer than `threshold`.
///
/// Only a multi-part skeleton is pruned; a skeleton that has collapsed to a
/// single line passes through unchanged even when both its ends are free.
/// A part disjoint at both ends is judged solely on length.
pub fn prune(skeleton: LinearGeometry, threshold: f64) -> LinearGeometry {
    match skeleton {
        single @ LinearGeometry::Single(_) => single,
        LinearGeometry::Multi(mls) => {
            let parts = mls.0;

            let survivors: Vec<_> = parts
                .iter()
                .enumerate()
                .filter(|(i, part)| {
                    let [first, .., last] = part.0.as_slice() else {
                        return false;
                    };
                    let (first, last) = (*first, *last);

                    let others = MultiLineString::new(
                        parts
                            .iter()
                            .enumerate()
                            .filter(|(j, _)| j != i)
                            .map(|(_, other)| other.clone())
                            .collect(),
                    );

                    let mut dead_end = false;
                    if !Point::from(first).intersects(&others) {
                        dead_end = true;
                    }
                    if !Point::from(last).intersects(&others) {
                        dead_end = true;
                    }

                    !dead_end || part.length(&Euclidean) > threshold
                })
                .map(|(_, part)| part.clone())
                .collect();

            LinearGeometry::Multi(MultiLineString::new(survivors))
        }
    }
}
