use foundation::Unit;

/// Geographic position in degrees with an altitude in `altitude_unit`.
///
/// NaN latitude or longitude marks a missing location; a NaN altitude is
/// tolerated and replaced by the reference altitude when mapped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub altitude_unit: Unit,
}

impl GeoPoint {
    /// Altitude in meters; longitude outside [-180, 180] is wrapped.
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self::with_unit(latitude, longitude, altitude, Unit::Meter)
    }

    pub fn with_unit(latitude: f64, longitude: f64, altitude: f64, altitude_unit: Unit) -> Self {
        Self {
            latitude,
            longitude: normalize_longitude(longitude),
            altitude,
            altitude_unit,
        }
    }

    pub fn surface(latitude: f64, longitude: f64) -> Self {
        Self::new(latitude, longitude, 0.0)
    }

    pub fn missing() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }

    pub fn is_missing(&self) -> bool {
        self.latitude.is_nan() || self.longitude.is_nan()
    }
}

/// Wraps a longitude into [-180, 180]; values already inside are kept as is.
pub fn normalize_longitude(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) || !lon.is_finite() {
        return lon;
    }
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Lat/lon bounding box in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLonBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl LatLonBox {
    pub const WORLD: Self = Self {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}
