//! Geographic position to display space.
//!
//! Each geographic quantity goes through an [`AxisMap`] (a linear map from a
//! data range onto a display axis range) and then through the spherical
//! display coordinate system. Altitude maps onto the display radius so that
//! the vertical range `[min, max]` spans radius `[0, 2]`; the middle of the
//! range sits on the unit sphere.

use foundation::math::Vec3;
use foundation::{Dimension, Unit, UnitError};
use tracing::debug;

use crate::geo::GeoPoint;
use crate::spherical;

/// Mean Earth radius used for vertical exaggeration.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const DEFAULT_VERTICAL_MIN_M: f64 = -16_000.0;
pub const DEFAULT_VERTICAL_MAX_M: f64 = 16_000.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DisplayAxis {
    Latitude,
    Longitude,
    Radius,
}

impl DisplayAxis {
    /// Fixed display range of the axis.
    pub fn range(self) -> (f64, f64) {
        match self {
            DisplayAxis::Latitude => (-90.0, 90.0),
            DisplayAxis::Longitude => (-180.0, 180.0),
            DisplayAxis::Radius => (0.0, 2.0),
        }
    }
}

/// A named scalar quantity with its native unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    pub name: String,
    pub default_unit: Unit,
}

impl Quantity {
    pub fn new(name: impl Into<String>, default_unit: Unit) -> Self {
        Self {
            name: name.into(),
            default_unit,
        }
    }

    pub fn latitude() -> Self {
        Self::new("Latitude", Unit::Degree)
    }

    pub fn longitude() -> Self {
        Self::new("Longitude", Unit::Degree)
    }

    pub fn altitude() -> Self {
        Self::new("Altitude", Unit::Meter)
    }

    pub fn geopotential_altitude() -> Self {
        Self::new("GeopotentialAltitude", Unit::GeopotentialMeter)
    }

    fn is_geopotential(&self) -> bool {
        self.default_unit.dimension() == Dimension::GeopotentialLength
    }
}

/// Linear map from a quantity's data range onto a display axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMap {
    pub quantity: Quantity,
    pub axis: DisplayAxis,
    pub range: (f64, f64),
    pub unit: Unit,
}

impl AxisMap {
    pub fn new(quantity: Quantity, axis: DisplayAxis, range: (f64, f64), unit: Unit) -> Self {
        Self {
            quantity,
            axis,
            range,
            unit,
        }
    }

    /// Data value (in `unit`) to display value.
    pub fn scale(&self, value: f64) -> f64 {
        let (lo, hi) = self.range;
        let (dlo, dhi) = self.axis.range();
        dlo + (value - lo) / (hi - lo) * (dhi - dlo)
    }

    /// Display value back to a data value (in `unit`).
    pub fn inverse(&self, display: f64) -> f64 {
        let (lo, hi) = self.range;
        let (dlo, dhi) = self.axis.range();
        lo + (display - dlo) / (dhi - dlo) * (hi - lo)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MappingError {
    InvalidGeoPoint,
    InvalidRange { min: f64, max: f64 },
    IncompatibleUnit { unit: Unit, target: Unit },
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::InvalidGeoPoint => write!(f, "latitude or longitude is missing"),
            MappingError::InvalidRange { min, max } => {
                write!(f, "invalid vertical range [{min}, {max}]")
            }
            MappingError::IncompatibleUnit { unit, target } => {
                write!(f, "unit {unit} is not convertible to {target}")
            }
        }
    }
}

impl std::error::Error for MappingError {}

impl From<UnitError> for MappingError {
    fn from(e: UnitError) -> Self {
        match e {
            UnitError::Incompatible { from, to } => MappingError::IncompatibleUnit {
                unit: from,
                target: to,
            },
        }
    }
}

/// Bidirectional map between [`GeoPoint`] and display space.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    latitude: AxisMap,
    longitude: AxisMap,
    altitude: AxisMap,
    vertical: Vec<AxisMap>,
    reference_altitude: f64,
    revision: u64,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::build(DEFAULT_VERTICAL_MIN_M, DEFAULT_VERTICAL_MAX_M, Unit::Meter)
    }
}

impl CoordinateMapper {
    pub fn new(min: f64, max: f64, unit: Unit) -> Result<Self, MappingError> {
        validate_range(min, max)?;
        validate_range_unit(unit)?;
        Ok(Self::build(min, max, unit))
    }

    fn build(min: f64, max: f64, unit: Unit) -> Self {
        Self {
            latitude: AxisMap::new(
                Quantity::latitude(),
                DisplayAxis::Latitude,
                (-90.0, 90.0),
                Unit::Degree,
            ),
            longitude: AxisMap::new(
                Quantity::longitude(),
                DisplayAxis::Longitude,
                (-180.0, 180.0),
                Unit::Degree,
            ),
            altitude: AxisMap::new(Quantity::altitude(), DisplayAxis::Radius, (min, max), unit),
            vertical: Vec::new(),
            reference_altitude: 0.0,
            revision: 0,
        }
    }

    pub fn vertical_range(&self) -> (f64, f64) {
        self.altitude.range
    }

    pub fn vertical_unit(&self) -> Unit {
        self.altitude.unit
    }

    /// Bumped whenever the vertical range or unit changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn reference_altitude(&self) -> f64 {
        self.reference_altitude
    }

    /// Altitude (in the vertical unit) used when a point carries none.
    pub fn set_reference_altitude(&mut self, altitude: f64) {
        self.reference_altitude = altitude;
    }

    pub fn vertical_maps(&self) -> &[AxisMap] {
        &self.vertical
    }

    pub fn geo_to_scene(&self, p: GeoPoint) -> Result<Vec3, MappingError> {
        if p.is_missing() {
            return Err(MappingError::InvalidGeoPoint);
        }
        let altitude = if p.altitude.is_nan() {
            self.reference_altitude
        } else {
            p.altitude_unit
                .convert_vertical(p.altitude, self.altitude.unit)?
        };
        Ok(spherical::to_cartesian(
            self.latitude.scale(p.latitude),
            self.longitude.scale(p.longitude),
            self.altitude.scale(altitude),
        ))
    }

    /// Display point to geographic position; altitude is in the vertical unit.
    ///
    /// `altitude = radius * (max - min) / 2 + min`.
    pub fn scene_to_geo(&self, p: Vec3) -> GeoPoint {
        let (lat, lon, radius) = spherical::from_cartesian(p);
        let (min, max) = self.altitude.range;
        GeoPoint::with_unit(
            self.latitude.inverse(lat),
            self.longitude.inverse(lon),
            radius * (max - min) / 2.0 + min,
            self.altitude.unit,
        )
    }

    /// Returns `Ok(false)` when the range is already current.
    pub fn set_vertical_range(&mut self, min: f64, max: f64) -> Result<bool, MappingError> {
        validate_range(min, max)?;
        if self.altitude.range == (min, max) {
            return Ok(false);
        }
        self.altitude.range = (min, max);
        for map in &mut self.vertical {
            map.range = (min, max);
        }
        self.revision += 1;
        debug!(min, max, unit = %self.altitude.unit, "vertical range changed");
        Ok(true)
    }

    pub fn set_vertical_range_unit(&mut self, unit: Unit) -> Result<(), MappingError> {
        validate_range_unit(unit)?;
        if self.altitude.unit == unit {
            return Ok(());
        }
        self.altitude.unit = unit;
        for map in &mut self.vertical {
            map.unit = vertical_map_unit(&map.quantity, unit);
        }
        self.revision += 1;
        debug!(unit = %unit, "vertical range unit changed");
        Ok(())
    }

    /// Validates both inputs before applying either.
    pub fn apply_vertical_scale(&mut self, unit: Unit, min: f64, max: f64) -> Result<(), MappingError> {
        validate_range_unit(unit)?;
        validate_range(min, max)?;
        self.set_vertical_range_unit(unit)?;
        self.set_vertical_range(min, max)?;
        Ok(())
    }

    /// Registers an auxiliary vertical quantity, replacing one of the same name.
    pub fn add_vertical_map(&mut self, quantity: Quantity) -> Result<(), MappingError> {
        if !quantity.default_unit.is_vertical() {
            return Err(MappingError::IncompatibleUnit {
                unit: quantity.default_unit,
                target: Unit::Meter,
            });
        }
        let map = AxisMap::new(
            quantity.clone(),
            DisplayAxis::Radius,
            self.altitude.range,
            vertical_map_unit(&quantity, self.altitude.unit),
        );
        match self.vertical.iter_mut().find(|m| m.quantity == quantity) {
            Some(existing) => *existing = map,
            None => self.vertical.push(map),
        }
        Ok(())
    }

    pub fn remove_vertical_map(&mut self, quantity: &Quantity) -> bool {
        let before = self.vertical.len();
        self.vertical.retain(|m| &m.quantity != quantity);
        self.vertical.len() != before
    }

    /// Display radius of `value` (in the quantity's default unit), or `None`
    /// when the quantity is not registered.
    pub fn vertical_to_radius(&self, quantity: &Quantity, value: f64) -> Option<f64> {
        let map = self.vertical.iter().find(|m| &m.quantity == quantity)?;
        let v = quantity.default_unit.convert_vertical(value, map.unit).ok()?;
        Some(map.scale(v))
    }

    /// Earth radius over half the vertical range, both in meters.
    pub fn vertical_exaggeration(&self) -> f64 {
        let (min, max) = self.altitude.range;
        let half = self
            .altitude
            .unit
            .convert_vertical((max - min) / 2.0, Unit::Meter)
            .unwrap_or(f64::NAN);
        EARTH_RADIUS_M / half
    }

    /// Resizes the vertical range about its center to the given exaggeration.
    pub fn set_vertical_exaggeration(&mut self, factor: f64) -> Result<bool, MappingError> {
        let (min, max) = self.altitude.range;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(MappingError::InvalidRange { min, max });
        }
        let half = Unit::Meter.convert_vertical(EARTH_RADIUS_M / factor, self.altitude.unit)?;
        let center = (min + max) / 2.0;
        self.set_vertical_range(center - half, center + half)
    }
}

fn validate_range(min: f64, max: f64) -> Result<(), MappingError> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(MappingError::InvalidRange { min, max });
    }
    Ok(())
}

fn validate_range_unit(unit: Unit) -> Result<(), MappingError> {
    if !unit.can_convert(Unit::Meter) {
        return Err(MappingError::IncompatibleUnit {
            unit,
            target: Unit::Meter,
        });
    }
    Ok(())
}

// Geopotential quantities follow the range in the matching geopotential unit.
fn vertical_map_unit(quantity: &Quantity, range_unit: Unit) -> Unit {
    if quantity.is_geopotential() {
        range_unit.geopotential_counterpart().unwrap_or(range_unit)
    } else {
        range_unit
    }
}

#[cfg(test)]
mod tests {
    use super::{CoordinateMapper, MappingError, Quantity};
    use crate::geo::GeoPoint;
    use foundation::Unit;
    use foundation::math::Vec3;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn surface_point_lands_on_unit_sphere() {
        let mapper = CoordinateMapper::default();
        let p = mapper.geo_to_scene(GeoPoint::surface(0.0, 0.0)).expect("map");
        assert_close(p.x, 1.0, 1e-15);
        assert_close(p.y, 0.0, 1e-15);
        assert_close(p.z, 0.0, 1e-15);

        let top = mapper
            .geo_to_scene(GeoPoint::new(90.0, 0.0, 16_000.0))
            .expect("map");
        assert_close(top.z, 2.0, 1e-12);
    }

    #[test]
    fn radial_half_recovers_quarter_altitude() {
        let mut mapper = CoordinateMapper::default();
        mapper.set_vertical_range(-159_000.0, 159_000.0).expect("range");
        let geo = mapper.scene_to_geo(Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(geo.altitude, -79_500.0);
        assert_eq!(geo.altitude_unit, Unit::Meter);
    }

    #[test]
    fn round_trip_within_vertical_range() {
        let mapper = CoordinateMapper::default();
        for &lat in &[-89.0, -45.0, 0.0, 30.0, 89.0] {
            for &lon in &[-180.0, -120.0, 0.0, 45.5, 179.0] {
                for &alt in &[-15_000.0, -1.0, 0.0, 2_500.0, 16_000.0] {
                    let scene = mapper
                        .geo_to_scene(GeoPoint::new(lat, lon, alt))
                        .expect("map");
                    let back = mapper.scene_to_geo(scene);
                    assert_close(back.latitude, lat, 1e-9);
                    assert_close(back.longitude, lon, 1e-9);
                    assert_close(back.altitude, alt, 1e-6);
                }
            }
        }
    }

    #[test]
    fn missing_inputs() {
        let mapper = CoordinateMapper::default();
        assert_eq!(
            mapper.geo_to_scene(GeoPoint::new(f64::NAN, 10.0, 0.0)),
            Err(MappingError::InvalidGeoPoint)
        );
        let p = mapper
            .geo_to_scene(GeoPoint::new(0.0, 0.0, f64::NAN))
            .expect("nan altitude tolerated");
        assert_close(p.x, 1.0, 1e-15);
        assert!(mapper.scene_to_geo(Vec3::new(f64::NAN, 0.0, 0.0)).is_missing());
    }

    #[test]
    fn altitude_units_are_converted() {
        let mapper = CoordinateMapper::default();
        let a = mapper
            .geo_to_scene(GeoPoint::with_unit(0.0, 0.0, 8.0, Unit::Kilometer))
            .expect("km");
        assert_close(a.x, 1.5, 1e-12);
        let g = mapper
            .geo_to_scene(GeoPoint::with_unit(0.0, 0.0, 8.0, Unit::GeopotentialKilometer))
            .expect("gpkm");
        assert_close(g.x, 1.5, 1e-12);
        assert_eq!(
            mapper.geo_to_scene(GeoPoint::with_unit(0.0, 0.0, 850.0, Unit::Hectopascal)),
            Err(MappingError::IncompatibleUnit {
                unit: Unit::Hectopascal,
                target: Unit::Meter
            })
        );
    }

    #[test]
    fn invalid_ranges_leave_mapper_untouched() {
        let mut mapper = CoordinateMapper::default();
        for (min, max) in [(5.0, 5.0), (10.0, -10.0), (f64::NAN, 1.0), (0.0, f64::INFINITY)] {
            assert!(matches!(
                mapper.set_vertical_range(min, max),
                Err(MappingError::InvalidRange { .. })
            ));
        }
        assert_eq!(mapper.vertical_range(), (-16_000.0, 16_000.0));
        assert_eq!(mapper.revision(), 0);
        assert_eq!(mapper.set_vertical_range(-16_000.0, 16_000.0), Ok(false));
        assert_eq!(mapper.revision(), 0);
    }

    #[test]
    fn apply_vertical_scale_is_atomic() {
        let mut mapper = CoordinateMapper::default();
        assert!(mapper.apply_vertical_scale(Unit::Kilometer, 3.0, 1.0).is_err());
        assert_eq!(mapper.vertical_unit(), Unit::Meter);
        assert!(mapper.apply_vertical_scale(Unit::Kelvin, 0.0, 1.0).is_err());
        assert_eq!(mapper.vertical_range(), (-16_000.0, 16_000.0));

        mapper.apply_vertical_scale(Unit::Kilometer, -20.0, 20.0).expect("apply");
        assert_eq!(mapper.vertical_unit(), Unit::Kilometer);
        assert_eq!(mapper.vertical_range(), (-20.0, 20.0));
        assert_eq!(mapper.revision(), 2);
    }

    #[test]
    fn auxiliary_vertical_maps_follow_range_and_unit() {
        let mut mapper = CoordinateMapper::default();
        let gph = Quantity::geopotential_altitude();
        mapper.add_vertical_map(gph.clone()).expect("add");
        assert_eq!(mapper.vertical_maps()[0].unit, Unit::GeopotentialMeter);
        assert_eq!(mapper.vertical_to_radius(&gph, 0.0), Some(1.0));

        mapper.apply_vertical_scale(Unit::Kilometer, 0.0, 20.0).expect("apply");
        let map = &mapper.vertical_maps()[0];
        assert_eq!(map.unit, Unit::GeopotentialKilometer);
        assert_eq!(map.range, (0.0, 20.0));
        assert_eq!(mapper.vertical_to_radius(&gph, 10_000.0), Some(1.0));

        mapper.add_vertical_map(gph.clone()).expect("replace");
        assert_eq!(mapper.vertical_maps().len(), 1);

        let pressure = Quantity::new("Pressure", Unit::Hectopascal);
        assert!(mapper.add_vertical_map(pressure.clone()).is_err());
        assert!(!mapper.remove_vertical_map(&pressure));
        assert!(mapper.remove_vertical_map(&gph));
        assert_eq!(mapper.vertical_to_radius(&gph, 0.0), None);
    }

    #[test]
    fn range_unit_must_be_length() {
        let mut mapper = CoordinateMapper::default();
        assert_eq!(
            mapper.set_vertical_range_unit(Unit::GeopotentialMeter),
            Err(MappingError::IncompatibleUnit {
                unit: Unit::GeopotentialMeter,
                target: Unit::Meter
            })
        );
        mapper.set_vertical_range_unit(Unit::Foot).expect("feet");
        assert_eq!(mapper.vertical_unit(), Unit::Foot);
    }

    #[test]
    fn exaggeration_tracks_half_range() {
        let mut mapper = CoordinateMapper::default();
        assert_close(mapper.vertical_exaggeration(), 6_371_000.0 / 16_000.0, 1e-9);
        mapper.set_vertical_exaggeration(100.0).expect("set");
        let (min, max) = mapper.vertical_range();
        assert_close(min, -63_710.0, 1e-6);
        assert_close(max, 63_710.0, 1e-6);
        assert!(mapper.set_vertical_exaggeration(0.0).is_err());
    }
}
