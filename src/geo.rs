use serde::{Deserialize, Serialize};

/// A geographic point, serialized the way map widgets emit it: `{"lat": .., "lng": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A rectangle given by its south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub sw: LatLng,
    pub ne: LatLng,
}

impl LatLngBounds {
    pub fn new(sw: LatLng, ne: LatLng) -> Self {
        Self { sw, ne }
    }

    /// Arithmetic mean of each corner coordinate, taken independently.
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.ne.lat + self.sw.lat) / 2.0,
            (self.ne.lng + self.sw.lng) / 2.0,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.ne.lat - self.sw.lat
    }

    pub fn lng_span(&self) -> f64 {
        self.ne.lng - self.sw.lng
    }

    /// True when both corners are real coordinates and sw lies south-west of
    /// (or on) ne.
    pub fn is_valid(&self) -> bool {
        self.sw.in_range()
            && self.ne.in_range()
            && self.sw.lat <= self.ne.lat
            && self.sw.lng <= self.ne.lng
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.sw.lat
            && point.lat <= self.ne.lat
            && point.lng >= self.sw.lng
            && point.lng <= self.ne.lng
    }
}
