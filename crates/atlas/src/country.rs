use std::collections::HashMap;

use crate::boundary::BoundarySet;
use crate::pool::{self, PoolConfig};
use crate::shape::{CountryShape, PolygonShape};
use foundation::{seed32, GeoBounds, LatLng};

/// A country as indexed by the atlas: identity, display metadata, geometry,
/// and the precomputed interior sample pool.
///
/// Countries are built once when the boundary dataset loads and are
/// immutable afterward. The pool in particular is never regenerated.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    /// Stable index into the atlas.
    pub id: u32,
    /// ISO-like two-letter code. Absent for disputed territories; such
    /// countries keep geometry for map display but are excluded from
    /// code-based lookup (and therefore from presence rendering).
    pub code: Option<String>,
    pub name: String,
    pub shape: CountryShape,
    /// Unweighted mean of every ring vertex, holes flattened in. A known
    /// approximation kept for camera-framing compatibility; for irregular
    /// or multi-part countries it can fall outside the landmass.
    pub centroid: LatLng,
    pub bounds: GeoBounds,
    /// Precomputed interior points; at least one entry (centroid fallback).
    pub pool: Vec<LatLng>,
}

impl Country {
    /// Key used to derive per-identifier pool seeds and velocities.
    pub fn seed_key(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.name)
    }

    /// Deterministic pool point for a stable string key.
    pub fn pool_point(&self, key: &str) -> LatLng {
        let index = seed32(key) as usize % self.pool.len();
        self.pool[index]
    }
}

/// The full country index built from one boundary dataset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CountryAtlas {
    countries: Vec<Country>,
    by_code: HashMap<String, usize>,
}

impl CountryAtlas {
    pub fn build(set: &BoundarySet) -> Self {
        Self::build_with(set, PoolConfig::default())
    }

    pub fn build_with(set: &BoundarySet, pool_config: PoolConfig) -> Self {
        let mut countries = Vec::with_capacity(set.features.len());
        let mut by_code = HashMap::new();
        let mut fallback_pools = 0usize;

        for (index, feature) in set.features.iter().enumerate() {
            let id = index as u32;
            let (centroid, bounds) = centroid_and_bounds(&feature.shape);
            let seed_key = feature.code.clone().unwrap_or_else(|| feature.name.clone());
            let pool = pool::generate(&feature.shape, bounds, centroid, &seed_key, pool_config);
            if pool.len() == 1 {
                fallback_pools += 1;
                let outer_vertices = feature
                    .shape
                    .largest_polygon()
                    .and_then(PolygonShape::outer)
                    .map_or(0, |ring| ring.vertices.len());
                tracing::debug!(name = %feature.name, outer_vertices, "centroid-only pool");
            }

            if let Some(code) = &feature.code {
                // First feature wins on duplicate codes; later duplicates
                // keep their geometry but are unreachable by code.
                by_code.entry(code.clone()).or_insert(index);
            }

            countries.push(Country {
                id,
                code: feature.code.clone(),
                name: feature.name.clone(),
                shape: feature.shape.clone(),
                centroid,
                bounds,
                pool,
            });
        }

        tracing::debug!(
            countries = countries.len(),
            coded = by_code.len(),
            fallback_pools,
            "country atlas built"
        );
        Self { countries, by_code }
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn get(&self, id: u32) -> Option<&Country> {
        self.countries.get(id as usize)
    }

    pub fn by_code(&self, code: &str) -> Option<&Country> {
        self.by_code.get(code).map(|&index| &self.countries[index])
    }

    /// Codes with an indexed country, in atlas order.
    pub fn codes(&self) -> impl Iterator<Item = &str> + '_ {
        self.countries.iter().filter_map(|c| c.code.as_deref())
    }
}

/// Simple centroid (mean of all ring vertices, holes included) plus the
/// axis-aligned bounding box over the same vertex set.
fn centroid_and_bounds(shape: &CountryShape) -> (LatLng, GeoBounds) {
    let mut bounds = GeoBounds::empty();
    let mut lat_sum = 0.0;
    let mut lng_sum = 0.0;
    let mut count = 0usize;

    for ring in shape.rings() {
        for vertex in &ring.vertices {
            bounds.extend(*vertex);
            lat_sum += vertex.lat_deg;
            lng_sum += vertex.lng_deg;
            count += 1;
        }
    }

    if count == 0 {
        return (LatLng::default(), GeoBounds::empty());
    }
    let centroid = LatLng::new(lat_sum / count as f64, lng_sum / count as f64);
    (centroid, bounds)
}

#[cfg(test)]
mod tests {
    use super::{centroid_and_bounds, CountryAtlas};
    use crate::boundary::{BoundaryFeature, BoundarySet};
    use crate::pip;
    use crate::pool::PoolConfig;
    use crate::shape::{CountryShape, PolygonShape, Ring};
    use foundation::LatLng;

    fn square(min: f64, max: f64) -> CountryShape {
        CountryShape::Polygon(PolygonShape::new(vec![Ring::new(vec![
            LatLng::new(min, min),
            LatLng::new(min, max),
            LatLng::new(max, max),
            LatLng::new(max, min),
        ])]))
    }

    fn testland_set() -> BoundarySet {
        BoundarySet {
            features: vec![
                BoundaryFeature {
                    code: Some("TL".to_string()),
                    name: "Testland".to_string(),
                    shape: square(9.0, 11.0),
                },
                BoundaryFeature {
                    code: None,
                    name: "Disputed".to_string(),
                    shape: CountryShape::Unindexed,
                },
            ],
        }
    }

    #[test]
    fn centroid_is_unweighted_vertex_mean() {
        let (centroid, bounds) = centroid_and_bounds(&square(9.0, 11.0));
        assert_eq!(centroid, LatLng::new(10.0, 10.0));
        assert_eq!(bounds.min_lat, 9.0);
        assert_eq!(bounds.max_lng, 11.0);
    }

    #[test]
    fn holes_are_flattened_into_the_centroid() {
        // Outer square 0..4 with a hole square 3..4: the hole vertices drag
        // the mean toward the hole. Preserved approximation, not a bug.
        let shape = CountryShape::Polygon(PolygonShape::new(vec![
            Ring::new(vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 4.0),
                LatLng::new(4.0, 4.0),
                LatLng::new(4.0, 0.0),
            ]),
            Ring::new(vec![
                LatLng::new(3.0, 3.0),
                LatLng::new(3.0, 4.0),
                LatLng::new(4.0, 4.0),
                LatLng::new(4.0, 3.0),
            ]),
        ]));
        let (centroid, _) = centroid_and_bounds(&shape);
        assert_eq!(centroid, LatLng::new(2.75, 2.75));
    }

    #[test]
    fn build_indexes_by_code_and_pools_every_country() {
        let atlas = CountryAtlas::build_with(
            &testland_set(),
            PoolConfig {
                target: 32,
                attempts_per_point: 40,
            },
        );
        assert_eq!(atlas.len(), 2);

        let testland = atlas.by_code("TL").expect("TL indexed");
        assert_eq!(testland.name, "Testland");
        assert_eq!(testland.pool.len(), 32);
        for point in &testland.pool {
            assert!(pip::shape_contains(&testland.shape, *point));
        }

        // The uncoded territory keeps geometry but no code lookup.
        assert!(atlas.by_code("Disputed").is_none());
        let disputed = atlas.get(1).expect("still present by id");
        assert_eq!(disputed.pool, vec![LatLng::default()]);
        assert_eq!(atlas.codes().collect::<Vec<_>>(), vec!["TL"]);
    }

    #[test]
    fn pool_point_is_stable_per_key() {
        let atlas = CountryAtlas::build_with(
            &testland_set(),
            PoolConfig {
                target: 32,
                attempts_per_point: 40,
            },
        );
        let testland = atlas.by_code("TL").expect("TL indexed");
        let a = testland.pool_point("u1:TL");
        let b = testland.pool_point("u1:TL");
        let c = testland.pool_point("u2:TL");
        assert_eq!(a, b);
        // Different keys usually land elsewhere in a 32-point pool; at the
        // very least the chosen point is inside the country.
        assert!(pip::shape_contains(&testland.shape, c));
    }

    #[test]
    fn duplicate_codes_keep_the_first_feature() {
        let set = BoundarySet {
            features: vec![
                BoundaryFeature {
                    code: Some("AA".to_string()),
                    name: "First".to_string(),
                    shape: square(0.0, 1.0),
                },
                BoundaryFeature {
                    code: Some("AA".to_string()),
                    name: "Second".to_string(),
                    shape: square(5.0, 6.0),
                },
            ],
        };
        let atlas = CountryAtlas::build_with(
            &set,
            PoolConfig {
                target: 4,
                attempts_per_point: 40,
            },
        );
        assert_eq!(atlas.by_code("AA").map(|c| c.name.as_str()), Some("First"));
        assert_eq!(atlas.len(), 2);
    }
}
