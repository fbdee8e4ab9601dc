//! Point-in-polygon tests.
//!
//! Pure ray casting: no side effects, deterministic, O(total vertex count)
//! per call. Points exactly on an edge may resolve either way; that is
//! floating-point boundary behavior, not something callers should rely on.

use crate::shape::{CountryShape, PolygonShape, Ring};
use foundation::LatLng;

/// Guards the edge-crossing division against near-horizontal edges.
const DENOM_EPSILON: f64 = 1e-12;

/// Crossing-parity test of one ring.
///
/// Casts a horizontal ray east from `point` and toggles on each edge whose
/// latitude span straddles the query latitude and whose crossing longitude
/// lies east of the query longitude. Odd crossings = inside.
pub fn point_in_ring(point: LatLng, ring: &Ring) -> bool {
    let v = &ring.vertices;
    let n = v.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (lat_i, lng_i) = (v[i].lat_deg, v[i].lng_deg);
        let (lat_j, lng_j) = (v[j].lat_deg, v[j].lng_deg);

        if (lat_i > point.lat_deg) != (lat_j > point.lat_deg) {
            let mut denom = lat_j - lat_i;
            if denom.abs() < DENOM_EPSILON {
                denom = if denom.is_sign_negative() {
                    -DENOM_EPSILON
                } else {
                    DENOM_EPSILON
                };
            }
            let lng_cross = (lng_j - lng_i) * (point.lat_deg - lat_i) / denom + lng_i;
            if point.lng_deg < lng_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Inside the outer ring and inside none of the hole rings.
pub fn point_in_polygon(point: LatLng, polygon: &PolygonShape) -> bool {
    let Some(outer) = polygon.outer() else {
        return false;
    };
    if !point_in_ring(point, outer) {
        return false;
    }
    !polygon
        .holes()
        .iter()
        .any(|hole| point_in_ring(point, hole))
}

/// Containment against a country's indexed geometry.
///
/// MultiPolygon is a union that short-circuits on the first containing
/// polygon; `Unindexed` contains nothing.
pub fn shape_contains(shape: &CountryShape, point: LatLng) -> bool {
    match shape {
        CountryShape::Polygon(polygon) => point_in_polygon(point, polygon),
        CountryShape::MultiPolygon(polygons) => {
            polygons.iter().any(|p| point_in_polygon(point, p))
        }
        CountryShape::Unindexed => false,
    }
}
