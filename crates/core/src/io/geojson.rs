//! GeoJSON data types and conversions.
//!
//! Lightweight serde models for GeoJSON FeatureCollections, covering the
//! subset ribbonline consumes and produces: Point, LineString,
//! MultiLineString, Polygon and MultiPolygon geometries, flat attribute
//! maps, and the legacy `crs` member (the parcel API emits one).

use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::vector::{AttributeValue, Feature, FeatureCollection};
use geo_types::{
    Coord, Geometry, LineString, MultiLineString, MultiPolygon, Point, Polygon,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Serde models
// ---------------------------------------------------------------------------

/// A GeoJSON FeatureCollection document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeatureCollection {
    #[serde(rename = "type")]
    pub type_: String,

    #[serde(default)]
    pub features: Vec<GeoJsonFeature>,

    /// Legacy named-CRS member; absent means WGS84 per RFC 7946, but we
    /// keep `None` and let callers decide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crs: Option<GeoJsonCrs>,
}

/// Legacy GeoJSON named CRS (`{"type": "name", "properties": {"name": ...}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonCrs {
    #[serde(rename = "type")]
    pub type_: String,
    pub properties: GeoJsonCrsProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonCrsProperties {
    pub name: String,
}

/// A single GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonFeature {
    #[serde(rename = "type")]
    pub type_: String,

    /// Feature id; GeoJSON allows both strings and numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    pub geometry: Option<GeoJsonGeometry>,

    #[serde(default)]
    pub properties: Option<HashMap<String, Value>>,
}

/// A GeoJSON geometry with raw coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoJsonGeometry {
    #[serde(rename = "type")]
    pub type_: String,
    pub coordinates: Value,
}

// ---------------------------------------------------------------------------
// Coordinate parsing
// ---------------------------------------------------------------------------

fn parse_position(value: &Value) -> Result<Coord<f64>> {
    let arr = value
        .as_array()
        .ok_or_else(|| Error::InvalidGeoJson("position is not an array".into()))?;
    if arr.len() < 2 {
        return Err(Error::InvalidGeoJson("position has fewer than 2 ordinates".into()));
    }
    let x = arr[0]
        .as_f64()
        .ok_or_else(|| Error::InvalidGeoJson("non-numeric ordinate".into()))?;
    let y = arr[1]
        .as_f64()
        .ok_or_else(|| Error::InvalidGeoJson("non-numeric ordinate".into()))?;
    Ok(Coord { x, y })
}

fn parse_line(value: &Value) -> Result<LineString<f64>> {
    let arr = value
        .as_array()
        .ok_or_else(|| Error::InvalidGeoJson("line coordinates are not an array".into()))?;
    let coords = arr.iter().map(parse_position).collect::<Result<Vec<_>>>()?;
    Ok(LineString::new(coords))
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let arr = value
        .as_array()
        .ok_or_else(|| Error::InvalidGeoJson("polygon coordinates are not an array".into()))?;
    let mut rings = arr.iter().map(parse_line).collect::<Result<Vec<_>>>()?;
    if rings.is_empty() {
        return Err(Error::InvalidGeoJson("polygon has no rings".into()));
    }
    let exterior = rings.remove(0);
    Ok(Polygon::new(exterior, rings))
}

/// Convert a raw GeoJSON geometry to a `geo` geometry.
pub fn geometry_from_json(gj: &GeoJsonGeometry) -> Result<Geometry<f64>> {
    match gj.type_.as_str() {
        "Point" => Ok(Geometry::Point(Point::from(parse_position(&gj.coordinates)?))),
        "LineString" => Ok(Geometry::LineString(parse_line(&gj.coordinates)?)),
        "MultiLineString" => {
            let arr = gj.coordinates.as_array().ok_or_else(|| {
                Error::InvalidGeoJson("MultiLineString coordinates are not an array".into())
            })?;
            let lines = arr.iter().map(parse_line).collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiLineString(MultiLineString::new(lines)))
        }
        "Polygon" => Ok(Geometry::Polygon(parse_polygon(&gj.coordinates)?)),
        "MultiPolygon" => {
            let arr = gj.coordinates.as_array().ok_or_else(|| {
                Error::InvalidGeoJson("MultiPolygon coordinates are not an array".into())
            })?;
            let polys = arr.iter().map(parse_polygon).collect::<Result<Vec<_>>>()?;
            Ok(Geometry::MultiPolygon(MultiPolygon::new(polys)))
        }
        other => Err(Error::UnsupportedGeometry(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Coordinate serialization
// ---------------------------------------------------------------------------

fn position_json(c: &Coord<f64>) -> Value {
    Value::from(vec![c.x, c.y])
}

fn line_json(ls: &LineString<f64>) -> Value {
    Value::from(ls.0.iter().map(position_json).collect::<Vec<_>>())
}

fn polygon_json(p: &Polygon<f64>) -> Value {
    let mut rings = vec![line_json(p.exterior())];
    rings.extend(p.interiors().iter().map(line_json));
    Value::from(rings)
}

/// Convert a `geo` geometry to a raw GeoJSON geometry.
pub fn geometry_to_json(geom: &Geometry<f64>) -> Result<GeoJsonGeometry> {
    let (type_, coordinates) = match geom {
        Geometry::Point(p) => ("Point", position_json(&p.0)),
        Geometry::LineString(ls) => ("LineString", line_json(ls)),
        Geometry::MultiLineString(mls) => (
            "MultiLineString",
            Value::from(mls.0.iter().map(line_json).collect::<Vec<_>>()),
        ),
        Geometry::Polygon(p) => ("Polygon", polygon_json(p)),
        Geometry::MultiPolygon(mp) => (
            "MultiPolygon",
            Value::from(mp.0.iter().map(polygon_json).collect::<Vec<_>>()),
        ),
        other => {
            return Err(Error::UnsupportedGeometry(format!("{:?}", other)));
        }
    };
    Ok(GeoJsonGeometry {
        type_: type_.to_string(),
        coordinates,
    })
}

// ---------------------------------------------------------------------------
// Attribute conversion
// ---------------------------------------------------------------------------

fn attribute_from_value(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null,
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => AttributeValue::Int(i),
            None => AttributeValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => AttributeValue::String(s.clone()),
        // Nested values are kept as their JSON text
        other => AttributeValue::String(other.to_string()),
    }
}

fn attribute_to_value(attr: &AttributeValue) -> Value {
    match attr {
        AttributeValue::Null => Value::Null,
        AttributeValue::Bool(b) => Value::from(*b),
        AttributeValue::Int(i) => Value::from(*i),
        AttributeValue::Float(f) => Value::from(*f),
        AttributeValue::String(s) => Value::from(s.clone()),
    }
}

// ---------------------------------------------------------------------------
// Collection conversion
// ---------------------------------------------------------------------------

/// Parse a GeoJSON string into a [`FeatureCollection`].
///
/// MultiPolygon features are split into one feature per member polygon, so
/// downstream stages always see single polygons.
pub fn collection_from_str(s: &str) -> Result<FeatureCollection> {
    let doc: GeoJsonFeatureCollection = serde_json::from_str(s)?;
    if doc.type_ != "FeatureCollection" {
        return Err(Error::InvalidGeoJson(format!(
            "expected FeatureCollection, got {}",
            doc.type_
        )));
    }

    let crs = doc.crs.as_ref().map(|c| Crs::from_name(&c.properties.name));
    let mut out = FeatureCollection::with_crs(crs);

    for gj in &doc.features {
        let id = gj.id.as_ref().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        let mut properties = HashMap::new();
        if let Some(props) = &gj.properties {
            for (k, v) in props {
                properties.insert(k.clone(), attribute_from_value(v));
            }
        }

        let geometry = match &gj.geometry {
            Some(g) => Some(geometry_from_json(g)?),
            None => None,
        };

        match geometry {
            Some(Geometry::MultiPolygon(mp)) => {
                for poly in mp.0 {
                    out.push(Feature {
                        geometry: Some(Geometry::Polygon(poly)),
                        properties: properties.clone(),
                        id: id.clone(),
                    });
                }
            }
            geometry => out.push(Feature {
                geometry,
                properties,
                id,
            }),
        }
    }

    Ok(out)
}

/// Serialize a [`FeatureCollection`] to a GeoJSON string.
pub fn collection_to_string(fc: &FeatureCollection) -> Result<String> {
    let features = fc
        .features
        .iter()
        .map(|f| {
            let geometry = match &f.geometry {
                Some(g) => Some(geometry_to_json(g)?),
                None => None,
            };
            let properties = f
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), attribute_to_value(v)))
                .collect();
            Ok(GeoJsonFeature {
                type_: "Feature".to_string(),
                id: f.id.as_ref().map(|s| Value::from(s.clone())),
                geometry,
                properties: Some(properties),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let doc = GeoJsonFeatureCollection {
        type_: "FeatureCollection".to_string(),
        features,
        crs: fc.crs.as_ref().map(|c| GeoJsonCrs {
            type_: "name".to_string(),
            properties: GeoJsonCrsProperties {
                name: c.name().to_string(),
            },
        }),
    };

    Ok(serde_json::to_string(&doc)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
  "type": "FeatureCollection",
  "crs": {"type": "name", "properties": {"name": "urn:ogc:def:crs:EPSG::27700"}},
  "features": [
    {
      "type": "Feature",
      "id": "osgb1000021445364",
      "geometry": {
        "type": "Polygon",
        "coordinates": [
          [[0.0, 0.0], [20.0, 0.0], [20.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
          [[8.0, 4.0], [12.0, 4.0], [12.0, 6.0], [8.0, 6.0], [8.0, 4.0]]
        ]
      },
      "properties": {"classification_code": 10123, "area": 200.0, "theme": "Land"}
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[30.0, 0.0], [40.0, 0.0], [40.0, 5.0], [30.0, 5.0], [30.0, 0.0]]],
          [[[50.0, 0.0], [60.0, 0.0], [60.0, 5.0], [50.0, 5.0], [50.0, 0.0]]]
        ]
      },
      "properties": {"classification_code": 10172}
    }
  ]
}"#;

    #[test]
    fn parse_collection_with_crs_and_holes() {
        let fc = collection_from_str(FIXTURE).unwrap();
        assert_eq!(fc.crs.as_ref().and_then(|c| c.epsg()), Some(27700));

        let poly = fc.features[0].polygon().expect("polygon geometry");
        assert_eq!(poly.exterior().0.len(), 5);
        assert_eq!(poly.interiors().len(), 1);
        assert_eq!(
            fc.features[0]
                .get_property("classification_code")
                .and_then(|v| v.as_f64()),
            Some(10123.0)
        );
    }

    #[test]
    fn multipolygon_splits_per_member() {
        let fc = collection_from_str(FIXTURE).unwrap();
        // 1 polygon + 2 multipolygon members
        assert_eq!(fc.len(), 3);
        assert!(fc.features[1].polygon().is_some());
        assert!(fc.features[2].polygon().is_some());
        // Attributes are copied onto each member
        assert_eq!(
            fc.features[2]
                .get_property("classification_code")
                .and_then(|v| v.as_f64()),
            Some(10172.0)
        );
    }

    #[test]
    fn write_then_reparse() {
        let fc = collection_from_str(FIXTURE).unwrap();
        let text = collection_to_string(&fc).unwrap();
        let again = collection_from_str(&text).unwrap();
        assert_eq!(again.len(), fc.len());
        assert_eq!(
            again.crs.as_ref().map(|c| c.name().to_string()),
            fc.crs.as_ref().map(|c| c.name().to_string())
        );
    }

    #[test]
    fn rejects_non_collection() {
        let err = collection_from_str(r#"{"type": "Feature", "geometry": null}"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_unknown_geometry_type() {
        let doc = r#"{
          "type": "FeatureCollection",
          "features": [
            {"type": "Feature", "geometry": {"type": "Curve", "coordinates": []}, "properties": {}}
          ]
        }"#;
        match collection_from_str(doc) {
            Err(Error::UnsupportedGeometry(t)) => assert_eq!(t, "Curve"),
            other => panic!("expected UnsupportedGeometry, got {:?}", other),
        }
    }
}
