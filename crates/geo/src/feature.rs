//! Input features and their geometry.
//!
//! Features arrive as a GeoJSON `FeatureCollection` (the post-parse form of
//! whatever KML/KMZ source a host loaded). Only `Point`, `Polygon` and
//! `MultiPolygon` geometries are understood; positions are `[lng, lat]`.

use crate::{Coordinate, GeoError, Result};
use geo::{Centroid, Contains};
use geojson::feature::Id;
use geojson::{PolygonType, Position, Value as GeoJsonValue};
use serde::{Serialize, Serializer};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// A scalar property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// JSON null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Any JSON number
    Number(f64),
    /// Text, including nested JSON flattened to its string form
    Text(String),
}

impl PropertyValue {
    /// Numeric view of the value; numeric strings are parsed after trimming.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) if n.is_finite() => Some(*n),
            PropertyValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Converts back to a JSON value.
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Null => Value::Null,
            PropertyValue::Bool(b) => Value::Bool(*b),
            PropertyValue::Number(n) => json!(n),
            PropertyValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl From<&Value> for PropertyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => PropertyValue::Null,
            Value::Bool(b) => PropertyValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(PropertyValue::Null, PropertyValue::Number),
            Value::String(s) => PropertyValue::Text(s.clone()),
            other => PropertyValue::Text(other.to_string()),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Property map. Keys iterate in sorted order, which keeps key detection deterministic.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Feature geometry in degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single position
    Point(Coordinate),
    /// Rings; the first is the exterior
    Polygon(Vec<Vec<Coordinate>>),
    /// Polygons, each a list of rings
    MultiPolygon(Vec<Vec<Vec<Coordinate>>>),
}

impl Geometry {
    /// Converts a parsed GeoJSON geometry.
    ///
    /// # Arguments
    /// * `value` - Geometry value as read by the `geojson` crate
    ///
    /// # Returns
    /// * `Ok(Geometry)` for `Point`, `Polygon` and `MultiPolygon`
    /// * `Err(GeoError::InvalidGeometry)` for any other geometry type
    /// * `Err(GeoError::InvalidCoordinate)` when a position is short or out of range
    pub fn from_geojson(value: &GeoJsonValue) -> Result<Self> {
        match value {
            GeoJsonValue::Point(position) => Ok(Geometry::Point(to_coordinate(position)?)),
            GeoJsonValue::Polygon(rings) => Ok(Geometry::Polygon(to_rings(rings)?)),
            GeoJsonValue::MultiPolygon(polygons) => {
                let polygons = polygons.iter().map(|p| to_rings(p)).collect::<Result<Vec<_>>>()?;
                Ok(Geometry::MultiPolygon(polygons))
            }
            other => {
                let kind = match other {
                    GeoJsonValue::MultiPoint(_) => "MultiPoint",
                    GeoJsonValue::LineString(_) => "LineString",
                    GeoJsonValue::MultiLineString(_) => "MultiLineString",
                    _ => "GeometryCollection",
                };
                Err(GeoError::InvalidGeometry(format!("unsupported geometry type {}", kind)))
            }
        }
    }

    /// Converts back to a GeoJSON geometry.
    pub fn to_geojson(&self) -> geojson::Geometry {
        let value = match self {
            Geometry::Point(c) => GeoJsonValue::Point(to_position(c)),
            Geometry::Polygon(rings) => GeoJsonValue::Polygon(to_polygon_type(rings)),
            Geometry::MultiPolygon(polygons) => {
                GeoJsonValue::MultiPolygon(polygons.iter().map(|p| to_polygon_type(p)).collect())
            }
        };
        geojson::Geometry::new(value)
    }

    /// True for `Polygon` and `MultiPolygon`.
    pub fn is_areal(&self) -> bool {
        !matches!(self, Geometry::Point(_))
    }

    /// Every position of the geometry, rings included, in source order.
    pub fn vertices(&self) -> Vec<Coordinate> {
        match self {
            Geometry::Point(c) => vec![*c],
            Geometry::Polygon(rings) => rings.iter().flatten().copied().collect(),
            Geometry::MultiPolygon(polygons) => polygons.iter().flatten().flatten().copied().collect(),
        }
    }

    /// Exterior ring of the polygon, or of the first polygon of a multipolygon.
    pub fn outer_ring(&self) -> Option<&[Coordinate]> {
        match self {
            Geometry::Point(_) => None,
            Geometry::Polygon(rings) => rings.first().map(Vec::as_slice),
            Geometry::MultiPolygon(polygons) => {
                polygons.first().and_then(|p| p.first()).map(Vec::as_slice)
            }
        }
    }

    /// First available position.
    pub fn first_vertex(&self) -> Option<Coordinate> {
        match self {
            Geometry::Point(c) => Some(*c),
            _ => self.outer_ring().and_then(|r| r.first().copied()),
        }
    }

    /// Planar centroid. Falls back to the first vertex when the area is degenerate.
    pub fn centroid(&self) -> Option<Coordinate> {
        let point = match self {
            Geometry::Point(c) => return Some(*c),
            Geometry::Polygon(rings) => to_geo_polygon(rings).and_then(|p| p.centroid()),
            Geometry::MultiPolygon(polygons) => {
                let polys: Vec<_> = polygons.iter().filter_map(|p| to_geo_polygon(p)).collect();
                geo::MultiPolygon::new(polys).centroid()
            }
        };

        point
            .map(|p| Coordinate::from_lng_lat(p.x(), p.y()))
            .filter(|c| c.latitude.is_finite() && c.longitude.is_finite())
            .or_else(|| self.first_vertex())
    }

    /// Centroid of the polygon that owns [`Geometry::outer_ring`].
    pub fn outer_centroid(&self) -> Option<Coordinate> {
        match self {
            Geometry::MultiPolygon(polygons) => {
                polygons.first().and_then(|first| Geometry::Polygon(first.clone()).centroid())
            }
            _ => self.centroid(),
        }
    }

    /// True when `point` lies strictly inside the polygon(s). Boundary points
    /// and invalid rings yield false.
    pub fn contains(&self, point: &Coordinate) -> bool {
        let p = geo::Point::new(point.longitude, point.latitude);
        match self {
            Geometry::Point(_) => false,
            Geometry::Polygon(rings) => match to_geo_polygon(rings) {
                Some(poly) => poly.contains(&p),
                None => {
                    tracing::debug!("containment skipped for invalid polygon");
                    false
                }
            },
            Geometry::MultiPolygon(polygons) => polygons
                .iter()
                .filter_map(|rings| to_geo_polygon(rings))
                .any(|poly| poly.contains(&p)),
        }
    }
}

/// An input feature with its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Source identifier (GeoJSON `id`), if any
    pub id: Option<String>,
    /// Geometry
    pub geometry: Geometry,
    /// Arbitrary scalar properties
    pub properties: Properties,
}

impl Feature {
    /// Creates a feature without properties.
    pub fn new(geometry: Geometry) -> Self {
        Self { id: None, geometry, properties: Properties::new() }
    }

    /// Builder: sets the source identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder: adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Converts a parsed GeoJSON feature. Numeric ids become strings.
    ///
    /// # Returns
    /// * `Err(GeoError::InvalidGeometry)` when the geometry is missing or unsupported
    /// * `Err(GeoError::InvalidCoordinate)` when a position is out of range
    pub fn from_geojson(feature: geojson::Feature) -> Result<Self> {
        let geometry = feature
            .geometry
            .as_ref()
            .ok_or_else(|| GeoError::InvalidGeometry("feature without geometry".into()))?;
        let geometry = Geometry::from_geojson(&geometry.value)?;

        let id = feature.id.map(|id| match id {
            Id::String(s) => s,
            Id::Number(n) => n.to_string(),
        });

        let properties = feature
            .properties
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), PropertyValue::from(v)))
            .collect();

        Ok(Self { id, geometry, properties })
    }

    /// Converts back to a GeoJSON feature.
    pub fn to_geojson(&self) -> geojson::Feature {
        geojson::Feature {
            bbox: None,
            geometry: Some(self.geometry.to_geojson()),
            id: self.id.clone().map(Id::String),
            properties: Some(self.properties.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
            foreign_members: None,
        }
    }
}

/// A parsed collection of features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    /// Features in source order
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Parses GeoJSON text: a `FeatureCollection`, a single `Feature`, or a bare array of features.
    ///
    /// Features with missing or unsupported geometry are skipped with a warning.
    pub fn from_geojson_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_geojson(&value)
    }

    /// Parses a GeoJSON value.
    pub fn from_geojson(value: &Value) -> Result<Self> {
        let raw: Vec<Value> = match value {
            Value::Array(items) => items.clone(),
            Value::Object(_) => match value.get("type").and_then(Value::as_str) {
                Some("FeatureCollection") => value
                    .get("features")
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default(),
                Some("Feature") => vec![value.clone()],
                other => {
                    return Err(GeoError::InvalidGeometry(format!(
                        "expected FeatureCollection or Feature, got {:?}",
                        other
                    )))
                }
            },
            _ => return Err(GeoError::InvalidGeometry("expected a GeoJSON object".into())),
        };

        let mut features = Vec::with_capacity(raw.len());
        for (index, item) in raw.into_iter().enumerate() {
            let parsed = geojson::Feature::from_json_value(item)
                .map_err(|e| GeoError::InvalidGeometry(e.to_string()))
                .and_then(Feature::from_geojson);
            match parsed {
                Ok(feature) => features.push(feature),
                Err(e) => tracing::warn!(index, error = %e, "skipping feature"),
            }
        }

        Ok(Self { features })
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when there are no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl From<Vec<Feature>> for FeatureCollection {
    fn from(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

/// Reads a `[lng, lat, ...]` position, rejecting values outside the valid range.
fn to_coordinate(position: &[f64]) -> Result<Coordinate> {
    let [lng, lat, ..] = position else {
        return Err(GeoError::InvalidCoordinate(format!(
            "position {:?} has fewer than 2 values",
            position
        )));
    };
    let coordinate = Coordinate::from_lng_lat(*lng, *lat);
    if !coordinate.is_valid() {
        return Err(GeoError::InvalidCoordinate(format!("position ({}, {}) out of range", lat, lng)));
    }
    Ok(coordinate)
}

fn to_rings(rings: &PolygonType) -> Result<Vec<Vec<Coordinate>>> {
    rings
        .iter()
        .map(|ring| ring.iter().map(|p| to_coordinate(p)).collect::<Result<Vec<_>>>())
        .collect()
}

fn to_position(c: &Coordinate) -> Position {
    vec![c.longitude, c.latitude]
}

fn to_polygon_type(rings: &[Vec<Coordinate>]) -> PolygonType {
    rings.iter().map(|r| r.iter().map(to_position).collect()).collect()
}

fn to_line_string(ring: &[Coordinate]) -> geo::LineString<f64> {
    ring.iter().map(|c| (c.longitude, c.latitude)).collect::<Vec<_>>().into()
}

/// Converts rings to a `geo::Polygon`, rejecting rings that cannot bound an area.
fn to_geo_polygon(rings: &[Vec<Coordinate>]) -> Option<geo::Polygon<f64>> {
    let exterior = rings.first()?;
    let finite = |r: &Vec<Coordinate>| r.iter().all(|c| c.latitude.is_finite() && c.longitude.is_finite());
    if exterior.len() < 3 || !rings.iter().all(finite) {
        return None;
    }
    let interiors = rings[1..].iter().map(|r| to_line_string(r)).collect();
    Some(geo::Polygon::new(to_line_string(exterior), interiors))
}
