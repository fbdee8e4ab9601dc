//! Boundary dataset parsing.
//!
//! The dataset is GeoJSON-shaped: a FeatureCollection whose features carry
//! a country code and display name in their properties and a `Polygon` or
//! `MultiPolygon` geometry as nested `[lng, lat]` arrays.
//!
//! Failure to parse the collection itself is fatal (there is no useful
//! engine without geometry). Per-feature geometry problems are not:
//! malformed rings are skipped and unsupported geometry leaves the feature
//! `Unindexed`, so one broken territory never aborts the rest of the load.

use serde_json::Value;

use crate::shape::{CountryShape, PolygonShape, Ring};
use foundation::LatLng;

/// One boundary feature as read from the dataset, before atlas indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Two-letter uppercase code; `None` for disputed or unrecognized
    /// territories (Natural Earth encodes these as `-99`).
    pub code: Option<String>,
    pub name: String,
    pub shape: CountryShape,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoundarySet {
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug)]
pub enum BoundaryParseError {
    InvalidJson { reason: String },
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryParseError::InvalidJson { reason } => {
                write!(f, "boundary dataset is not valid JSON: {reason}")
            }
            BoundaryParseError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryParseError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryParseError {}

impl BoundarySet {
    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryParseError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryParseError::InvalidJson {
                reason: e.to_string(),
            })?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, BoundaryParseError> {
        let obj = value
            .as_object()
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(BoundaryParseError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(BoundaryParseError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or(BoundaryParseError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                BoundaryParseError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(BoundaryParseError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let properties = feat_obj.get("properties").and_then(|v| v.as_object());
            let code = properties.and_then(property_code);
            let name = properties
                .and_then(property_name)
                .unwrap_or_else(|| format!("feature {index}"));

            let shape = feat_obj
                .get("geometry")
                .map(parse_shape)
                .unwrap_or(CountryShape::Unindexed);

            features.push(BoundaryFeature { code, name, shape });
        }

        Ok(Self { features })
    }
}

fn property_code(props: &serde_json::Map<String, Value>) -> Option<String> {
    ["iso_a2", "ISO_A2", "ISO_A2_EH", "code"]
        .iter()
        .find_map(|key| props.get(*key).and_then(|v| v.as_str()))
        .and_then(normalize_code)
}

fn property_name(props: &serde_json::Map<String, Value>) -> Option<String> {
    ["name", "NAME", "admin", "ADMIN"]
        .iter()
        .find_map(|key| props.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Accept exactly two ASCII letters, uppercased. Anything else (including
/// the `-99` disputed-territory marker) means "no code".
fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}

/// Geometry-level parsing never fails the load: anything unsupported or
/// malformed collapses to `Unindexed`.
fn parse_shape(value: &Value) -> CountryShape {
    let Some(obj) = value.as_object() else {
        return CountryShape::Unindexed;
    };
    let Some(ty) = obj.get("type").and_then(|v| v.as_str()) else {
        return CountryShape::Unindexed;
    };
    let Some(coords) = obj.get("coordinates") else {
        return CountryShape::Unindexed;
    };

    match ty {
        "Polygon" => parse_polygon(coords)
            .map(CountryShape::Polygon)
            .unwrap_or(CountryShape::Unindexed),
        "MultiPolygon" => {
            let Some(polys) = coords.as_array() else {
                return CountryShape::Unindexed;
            };
            let polygons: Vec<PolygonShape> =
                polys.iter().filter_map(parse_polygon).collect();
            if polygons.is_empty() {
                CountryShape::Unindexed
            } else {
                CountryShape::MultiPolygon(polygons)
            }
        }
        _ => CountryShape::Unindexed,
    }
}

fn parse_polygon(coords: &Value) -> Option<PolygonShape> {
    let rings_val = coords.as_array()?;
    // Malformed rings are simply skipped.
    let rings: Vec<Ring> = rings_val.iter().filter_map(parse_ring).collect();
    if rings.is_empty() {
        return None;
    }
    Some(PolygonShape::new(rings))
}

fn parse_ring(value: &Value) -> Option<Ring> {
    let verts_val = value.as_array()?;
    let mut vertices = Vec::with_capacity(verts_val.len());
    for vert in verts_val {
        vertices.push(parse_vertex(vert)?);
    }
    Some(Ring::new(vertices))
}

fn parse_vertex(value: &Value) -> Option<LatLng> {
    let pair = value.as_array()?;
    if pair.len() < 2 {
        return None;
    }
    let lng = pair[0].as_f64()?;
    let lat = pair[1].as_f64()?;
    Some(LatLng::new(lat, lng))
}
