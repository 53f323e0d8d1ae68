//! Spherical display coordinates.
//!
//! `(lat, lon, r)` in degrees and display radius maps to
//! `x = r cos(lat) cos(lon)`, `y = r cos(lat) sin(lon)`, `z = r sin(lat)`.

use foundation::math::Vec3;

pub fn to_cartesian(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = lon_deg.to_radians().sin_cos();
    Vec3::new(
        radius * cos_lat * cos_lon,
        radius * cos_lat * sin_lon,
        radius * sin_lat,
    )
}

/// Inverse of [`to_cartesian`]; returns `(lat_deg, lon_deg, radius)`.
///
/// At the origin latitude and longitude are reported as 0.
pub fn from_cartesian(p: Vec3) -> (f64, f64, f64) {
    let horizontal = p.x.hypot(p.y);
    let radius = horizontal.hypot(p.z);
    let lat = p.z.atan2(horizontal).to_degrees();
    let lon = p.y.atan2(p.x).to_degrees();
    (lat, lon, radius)
}
