//! Reconstruction of the output layers
//!
//! The ribbon layer buffers every segment by its width value (a one-sided
//! boundary distance), giving a capsule whose total cross-section is twice
//! the width value. Both layers report `width = 2 x width value`; the
//! doubling assumes the polygon is locally symmetric about the skeleton,
//! which is a modelling approximation carried over from the width estimate
//! itself.

use super::SegmentWidths;
use geo::{Coord, Geometry, Line, LineString, MultiLineString, Polygon};
use ribbonline_core::{AttributeValue, Feature};
use std::f64::consts::PI;

/// Parameters for capsule buffering
#[derive(Debug, Clone)]
pub struct BufferParams {
    /// Number of segments approximating each quarter circle of an end cap
    pub segments_per_quarter: usize,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            segments_per_quarter: 8,
        }
    }
}

/// Buffer a two-point segment by `radius`, producing a capsule: two
/// semicircular end caps joined by the offset sides.
///
/// A zero-length segment degenerates to a circle around its point. A
/// non-positive radius produces a degenerate ring collapsed onto the
/// segment.
pub fn buffer_segment(segment: &Line<f64>, radius: f64, params: &BufferParams) -> Polygon<f64> {
    let r = radius.max(0.0);
    let n = params.segments_per_quarter.max(1);

    let dx = segment.end.x - segment.start.x;
    let dy = segment.end.y - segment.start.y;
    let len = (dx * dx + dy * dy).sqrt();

    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(4 * n + 3);

    let mut arc = |centre: Coord<f64>, from: f64, sweep: f64, steps: usize| {
        for k in 0..=steps {
            let angle = from + sweep * k as f64 / steps as f64;
            coords.push(Coord {
                x: centre.x + r * angle.cos(),
                y: centre.y + r * angle.sin(),
            });
        }
    };

    if len == 0.0 {
        // Full circle around the collapsed segment
        arc(segment.start, 0.0, 2.0 * PI, 4 * n);
    } else {
        let heading = dy.atan2(dx);
        // End cap sweeps counter-clockwise from heading - 90 deg, then the
        // start cap continues around; the straight sides close the ring.
        arc(segment.end, heading - PI / 2.0, PI, 2 * n);
        arc(segment.start, heading + PI / 2.0, PI, 2 * n);
    }

    // Close the ring
    if let Some(&first) = coords.first() {
        coords.push(first);
    }

    Polygon::new(LineString::new(coords), vec![])
}

/// Ribbon rows for one feature: one per segment, buffered geometry, doubled
/// width attribute.
pub fn ribbon_features(record: &SegmentWidths, params: &BufferParams) -> Vec<Feature> {
    record
        .segments
        .iter()
        .zip(&record.widths)
        .map(|(segment, &width)| {
            let mut feature = Feature::new(Geometry::Polygon(buffer_segment(
                segment, width, params,
            )));
            feature.set_property("width", AttributeValue::Float(width * 2.0));
            feature
        })
        .collect()
}

/// The centreline row for one feature: the raw segments as a multi-part
/// line plus the doubled mean width. `None` for a feature whose skeleton
/// produced no segments.
pub fn centreline_feature(record: &SegmentWidths) -> Option<Feature> {
    if record.segments.is_empty() {
        return None;
    }

    let lines: Vec<LineString<f64>> = record
        .segments
        .iter()
        .map(|s| LineString::new(vec![s.start, s.end]))
        .collect();

    let mean_width = record.widths.iter().sum::<f64>() / record.widths.len() as f64;

    let mut feature = Feature::new(Geometry::MultiLineString(MultiLineString::new(lines)));
    feature.set_property("width", AttributeValue::Float(mean_width * 2.0));
    Some(feature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Contains, Point};

    #[test]
    fn capsule_area_approximates_rect_plus_circle() {
        let segment = Line::new((0.0, 0.0), (10.0, 0.0));
        let capsule = buffer_segment(&segment, 2.0, &BufferParams::default());

        // 10x4 rectangle plus a radius-2 circle from the two caps
        let expected = 10.0 * 4.0 + PI * 4.0;
        let error = (capsule.unsigned_area() - expected).abs() / expected;
        assert!(error < 0.02, "area error {:.3}", error);
    }

    #[test]
    fn capsule_contains_its_segment() {
        let segment = Line::new((1.0, 1.0), (6.0, 4.0));
        let capsule = buffer_segment(&segment, 1.5, &BufferParams::default());
        assert!(capsule.contains(&Point::new(3.5, 2.5)));
        assert!(!capsule.contains(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn zero_length_segment_buffers_to_circle() {
        let segment = Line::new((5.0, 5.0), (5.0, 5.0));
        let circle = buffer_segment(&segment, 3.0, &BufferParams::default());
        let expected = PI * 9.0;
        let error = (circle.unsigned_area() - expected).abs() / expected;
        assert!(error < 0.02);
    }

    #[test]
    fn ribbon_width_attribute_is_double_the_radius() {
        let record = SegmentWidths {
            segments: vec![
                Line::new((0.0, 0.0), (4.0, 0.0)),
                Line::new((4.0, 0.0), (8.0, 0.0)),
            ],
            widths: vec![1.5, 2.5],
        };
        let rows = ribbon_features(&record, &BufferParams::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].get_property("width").and_then(|v| v.as_f64()),
            Some(3.0)
        );
        assert_eq!(
            rows[1].get_property("width").and_then(|v| v.as_f64()),
            Some(5.0)
        );
    }

    #[test]
    fn centreline_row_carries_doubled_mean_width() {
        let record = SegmentWidths {
            segments: vec![
                Line::new((0.0, 0.0), (4.0, 0.0)),
                Line::new((4.0, 0.0), (8.0, 0.0)),
            ],
            widths: vec![1.0, 3.0],
        };
        let row = centreline_feature(&record).unwrap();
        assert_eq!(
            row.get_property("width").and_then(|v| v.as_f64()),
            Some(4.0)
        );
        match &row.geometry {
            Some(Geometry::MultiLineString(mls)) => assert_eq!(mls.0.len(), 2),
            other => panic!("expected MultiLineString, got {:?}", other),
        }
    }

    #[test]
    fn empty_record_has_no_centreline_row() {
        assert!(centreline_feature(&SegmentWidths::default()).is_none());
    }
}
