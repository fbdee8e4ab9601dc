use crate::geo::LatLng;

/// Axis-aligned geographic bounding box in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub fn new(min_lat: f64, min_lng: f64, max_lat: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }

    /// A box containing nothing; extending it with any point yields that
    /// point's degenerate box.
    pub fn empty() -> Self {
        Self {
            min_lat: f64::INFINITY,
            min_lng: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            max_lng: f64::NEG_INFINITY,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_lat > self.max_lat || self.min_lng > self.max_lng
    }

    pub fn extend(&mut self, point: LatLng) {
        self.min_lat = self.min_lat.min(point.lat_deg);
        self.max_lat = self.max_lat.max(point.lat_deg);
        self.min_lng = self.min_lng.min(point.lng_deg);
        self.max_lng = self.max_lng.max(point.lng_deg);
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat_deg >= self.min_lat
            && point.lat_deg <= self.max_lat
            && point.lng_deg >= self.min_lng
            && point.lng_deg <= self.max_lng
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        (self.max_lat - self.min_lat).max(0.0)
    }

    pub fn lng_span(&self) -> f64 {
        (self.max_lng - self.min_lng).max(0.0)
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::empty()
    }
}
