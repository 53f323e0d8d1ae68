use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

/// Auto-rotation direction as seen by the viewer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateDirection {
    Right,
    Left,
    Up,
    Down,
    Clockwise,
    CounterClockwise,
}

impl RotateDirection {
    /// Degrees per rotation step about x, y and z at scale 1.
    pub fn multiplier(self) -> Vec3 {
        match self {
            RotateDirection::Right => Vec3::new(0.0, -1.0, 0.0),
            RotateDirection::Left => Vec3::new(0.0, 1.0, 0.0),
            RotateDirection::Up => Vec3::new(1.0, 0.0, 0.0),
            RotateDirection::Down => Vec3::new(-1.0, 0.0, 0.0),
            RotateDirection::Clockwise => Vec3::new(0.0, 0.0, 1.0),
            RotateDirection::CounterClockwise => Vec3::new(0.0, 0.0, -1.0),
        }
    }
}
