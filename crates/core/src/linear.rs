//! Linear geometry with an explicit single-part / multi-part distinction
//!
//! Skeletons move through the pipeline as [`LinearGeometry`], and every
//! transform (merge, prune, simplify, segment) pattern-matches on the variant
//! rather than inspecting a runtime type tag. A `Multi` may legitimately hold
//! zero parts (a skeleton pruned away entirely) or one part (callers that
//! want the collapsed form should build via [`LinearGeometry::from_parts`]).

use geo::line_measures::LengthMeasurable;
use geo::{Euclidean, Geometry, LineString, MultiLineString};

/// A skeleton: one connected line, or a collection of disjoint line parts.
#[derive(Debug, Clone, PartialEq)]
pub enum LinearGeometry {
    Single(LineString<f64>),
    Multi(MultiLineString<f64>),
}

impl LinearGeometry {
    /// Build from a list of parts, collapsing a one-element list to `Single`.
    pub fn from_parts(mut parts: Vec<LineString<f64>>) -> Self {
        if parts.len() == 1 {
            Self::Single(parts.remove(0))
        } else {
            Self::Multi(MultiLineString::new(parts))
        }
    }

    /// The parts as a slice, regardless of variant.
    pub fn parts(&self) -> &[LineString<f64>] {
        match self {
            Self::Single(ls) => std::slice::from_ref(ls),
            Self::Multi(mls) => &mls.0,
        }
    }

    /// Consume into the list of parts.
    pub fn into_parts(self) -> Vec<LineString<f64>> {
        match self {
            Self::Single(ls) => vec![ls],
            Self::Multi(mls) => mls.0,
        }
    }

    pub fn num_parts(&self) -> usize {
        self.parts().len()
    }

    /// True when no part carries at least one segment.
    pub fn is_empty(&self) -> bool {
        self.parts().iter().all(|ls| ls.0.len() < 2)
    }

    /// Total Euclidean length across all parts.
    pub fn length(&self) -> f64 {
        self.parts().iter().map(|ls| ls.length(&Euclidean)).sum()
    }

    /// Convert to a `geo` geometry for I/O.
    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            Self::Single(ls) => Geometry::LineString(ls.clone()),
            Self::Multi(mls) => Geometry::MultiLineString(mls.clone()),
        }
    }
}

impl From<LineString<f64>> for LinearGeometry {
    fn from(ls: LineString<f64>) -> Self {
        Self::Single(ls)
    }
}

impl From<MultiLineString<f64>> for LinearGeometry {
    fn from(mls: MultiLineString<f64>) -> Self {
        Self::Multi(mls)
    }
}
