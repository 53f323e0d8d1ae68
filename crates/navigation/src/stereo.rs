use foundation::math::Vec3;

use crate::error::NavigationError;

/// Stereo eye offsets along the view-space x axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EyePositions {
    pub left: Vec3,
    pub right: Vec3,
}

impl EyePositions {
    /// Left eye at `-separation`, right at `+separation`. Negative values swap
    /// the eyes and are accepted.
    pub fn from_separation(separation: f64) -> Result<Self, NavigationError> {
        if !separation.is_finite() {
            return Err(NavigationError::InvalidEyeSeparation(separation));
        }
        Ok(Self {
            left: Vec3::new(-separation, 0.0, 0.0),
            right: Vec3::new(separation, 0.0, 0.0),
        })
    }
}
