//! Physical units used by vertical axes.
//!
//! The set is closed: only what vertical quantities and their display
//! ranges need. Conversion is allowed within a [`Dimension`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    GeopotentialLength,
    Angle,
    Pressure,
    Temperature,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "km")]
    Kilometer,
    #[serde(rename = "ft")]
    Foot,
    #[serde(rename = "gpm")]
    GeopotentialMeter,
    #[serde(rename = "gpkm")]
    GeopotentialKilometer,
    #[serde(rename = "deg")]
    Degree,
    #[serde(rename = "rad")]
    Radian,
    #[serde(rename = "hPa")]
    Hectopascal,
    #[serde(rename = "K")]
    Kelvin,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Foot => "ft",
            Unit::GeopotentialMeter => "gpm",
            Unit::GeopotentialKilometer => "gpkm",
            Unit::Degree => "deg",
            Unit::Radian => "rad",
            Unit::Hectopascal => "hPa",
            Unit::Kelvin => "K",
        }
    }

    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Meter | Unit::Kilometer | Unit::Foot => Dimension::Length,
            Unit::GeopotentialMeter | Unit::GeopotentialKilometer => Dimension::GeopotentialLength,
            Unit::Degree | Unit::Radian => Dimension::Angle,
            Unit::Hectopascal => Dimension::Pressure,
            Unit::Kelvin => Dimension::Temperature,
        }
    }

    // Factor to the base unit of the dimension (m, gpm, rad, hPa, K).
    fn factor(self) -> f64 {
        match self {
            Unit::Meter | Unit::GeopotentialMeter => 1.0,
            Unit::Kilometer | Unit::GeopotentialKilometer => 1000.0,
            Unit::Foot => 0.3048,
            Unit::Degree => core::f64::consts::PI / 180.0,
            Unit::Radian | Unit::Hectopascal | Unit::Kelvin => 1.0,
        }
    }

    pub fn can_convert(self, to: Unit) -> bool {
        self.dimension() == to.dimension()
    }

    /// Converts `value` expressed in `self` into `to`.
    pub fn convert(self, value: f64, to: Unit) -> Result<f64, UnitError> {
        if !self.can_convert(to) {
            return Err(UnitError::Incompatible { from: self, to });
        }
        if self == to {
            return Ok(value);
        }
        Ok(value * self.factor() / to.factor())
    }

    /// `true` for units a vertical (altitude-like) axis may carry.
    pub fn is_vertical(self) -> bool {
        matches!(
            self.dimension(),
            Dimension::Length | Dimension::GeopotentialLength
        )
    }

    /// Geometric length unit with the same magnitude, for geopotential units.
    ///
    /// Geopotential and geometric heights are treated as numerically equal
    /// when a vertical range is expressed in one and data in the other.
    pub fn length_equivalent(self) -> Unit {
        match self {
            Unit::GeopotentialMeter => Unit::Meter,
            Unit::GeopotentialKilometer => Unit::Kilometer,
            other => other,
        }
    }

    pub fn geopotential_counterpart(self) -> Option<Unit> {
        match self {
            Unit::Meter => Some(Unit::GeopotentialMeter),
            Unit::Kilometer => Some(Unit::GeopotentialKilometer),
            _ => None,
        }
    }

    /// Vertical conversion that bridges geometric and geopotential heights.
    pub fn convert_vertical(self, value: f64, to: Unit) -> Result<f64, UnitError> {
        if !self.is_vertical() || !to.is_vertical() {
            return Err(UnitError::Incompatible { from: self, to });
        }
        self.length_equivalent()
            .convert(value, to.length_equivalent())
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnitError {
    Incompatible { from: Unit, to: Unit },
}

impl std::fmt::Display for UnitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitError::Incompatible { from, to } => {
                write!(f, "cannot convert {from} to {to}")
            }
        }
    }
}

impl std::error::Error for UnitError {}

#[cfg(test)]
mod tests {
    use super::{Unit, UnitError};

    #[test]
    fn converts_within_dimension() {
        assert_eq!(Unit::Kilometer.convert(16.0, Unit::Meter), Ok(16_000.0));
        assert_eq!(Unit::Meter.convert(-79_500.0, Unit::Kilometer), Ok(-79.5));
        let ft = Unit::Foot.convert(1000.0, Unit::Meter).expect("length");
        assert!((ft - 304.8).abs() < 1e-9);
        let rad = Unit::Degree.convert(180.0, Unit::Radian).expect("angle");
        assert!((rad - core::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn rejects_cross_dimension_conversion() {
        assert_eq!(
            Unit::Hectopascal.convert(1000.0, Unit::Meter),
            Err(UnitError::Incompatible {
                from: Unit::Hectopascal,
                to: Unit::Meter
            })
        );
        assert!(!Unit::Meter.can_convert(Unit::GeopotentialMeter));
    }

    #[test]
    fn vertical_conversion_bridges_geopotential() {
        assert!(Unit::GeopotentialKilometer.is_vertical());
        assert!(!Unit::Kelvin.is_vertical());
        assert_eq!(
            Unit::GeopotentialKilometer.convert_vertical(2.0, Unit::Meter),
            Ok(2000.0)
        );
        assert_eq!(
            Unit::Meter.geopotential_counterpart(),
            Some(Unit::GeopotentialMeter)
        );
        assert!(Unit::Degree.convert_vertical(1.0, Unit::Meter).is_err());
    }

    #[test]
    fn serializes_as_symbol() {
        let json = serde_json::to_string(&Unit::Hectopascal).expect("serialize");
        assert_eq!(json, "\"hPa\"");
        let back: Unit = serde_json::from_str("\"gpkm\"").expect("deserialize");
        assert_eq!(back, Unit::GeopotentialKilometer);
    }
}
