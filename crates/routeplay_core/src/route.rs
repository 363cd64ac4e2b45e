use crate::geodesic::haversine_km;

/// A geographic position in degrees, latitude first.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a position from a GeoJSON-ordered `(longitude, latitude)` pair.
    pub const fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    pub fn distance_km(&self, other: &LatLon) -> f64 {
        haversine_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Ordered, immutable sequence of positions along the computed route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RouteGeometry {
    points: Vec<LatLon>,
}

impl RouteGeometry {
    pub fn new(points: Vec<LatLon>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Initial map center; `None` for an empty route.
    pub fn start(&self) -> Option<LatLon> {
        self.points.first().copied()
    }

    /// Sum of the great-circle lengths of all consecutive segments.
    pub fn total_distance_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_km(&pair[1]))
            .sum()
    }
}

impl From<Vec<LatLon>> for RouteGeometry {
    fn from(points: Vec<LatLon>) -> Self {
        Self::new(points)
    }
}
