use foundation::LatLng;

/// One closed boundary loop, in vertex order.
///
/// Ring 0 of a polygon is the outer boundary; later rings are holes.
/// Degenerate rings (fewer than 3 vertices) are tolerated but bound no area.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring {
    pub vertices: Vec<LatLng>,
}

impl Ring {
    pub fn new(vertices: Vec<LatLng>) -> Self {
        Self { vertices }
    }

    pub fn is_degenerate(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Signed area via the shoelace formula (positive = counter-clockwise).
    pub fn signed_area(&self) -> f64 {
        let v = &self.vertices;
        let n = v.len();
        if n < 3 {
            return 0.0;
        }
        let mut area = 0.0;
        let mut j = n - 1;
        for i in 0..n {
            area += (v[j].lng_deg - v[i].lng_deg) * (v[j].lat_deg + v[i].lat_deg);
            j = i;
        }
        area / 2.0
    }
}

/// Outer ring plus zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonShape {
    pub rings: Vec<Ring>,
}

impl PolygonShape {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }

    pub fn outer(&self) -> Option<&Ring> {
        self.rings.first()
    }

    pub fn holes(&self) -> &[Ring] {
        if self.rings.is_empty() {
            &[]
        } else {
            &self.rings[1..]
        }
    }
}

/// Indexed geometry for one country.
///
/// `Unindexed` captures unsupported or malformed source geometry: the
/// country keeps centroid-only fallback behavior instead of aborting the
/// dataset load.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CountryShape {
    Polygon(PolygonShape),
    MultiPolygon(Vec<PolygonShape>),
    #[default]
    Unindexed,
}

impl CountryShape {
    pub fn is_indexed(&self) -> bool {
        !matches!(self, CountryShape::Unindexed)
    }

    /// All rings of all constituent polygons, holes included.
    pub fn rings(&self) -> Box<dyn Iterator<Item = &Ring> + '_> {
        match self {
            CountryShape::Polygon(polygon) => Box::new(polygon.rings.iter()),
            CountryShape::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flat_map(|p| p.rings.iter()))
            }
            CountryShape::Unindexed => Box::new(std::iter::empty()),
        }
    }

    /// The constituent polygon with the largest outer-ring area.
    pub fn largest_polygon(&self) -> Option<&PolygonShape> {
        let candidates: &[PolygonShape] = match self {
            CountryShape::Polygon(polygon) => std::slice::from_ref(polygon),
            CountryShape::MultiPolygon(polygons) => polygons,
            CountryShape::Unindexed => &[],
        };
        candidates.iter().max_by(|a, b| {
            let area_a = a.outer().map(Ring::signed_area).unwrap_or(0.0).abs();
            let area_b = b.outer().map(Ring::signed_area).unwrap_or(0.0).abs();
            area_a.total_cmp(&area_b)
        })
    }
}
