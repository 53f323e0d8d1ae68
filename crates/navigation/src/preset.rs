use foundation::math::Rotation;
use serde::{Deserialize, Serialize};

/// Fixed orthogonal camera orientations.
///
/// Each preset turns a different principal direction of the display toward
/// the viewer: Top `+Z`, Bottom `-Z`, North `+Y`, South `-Y`, East `+X`,
/// West `-X`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPreset {
    Top,
    Bottom,
    North,
    South,
    East,
    West,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 6] = [
        ViewPreset::Top,
        ViewPreset::Bottom,
        ViewPreset::North,
        ViewPreset::South,
        ViewPreset::East,
        ViewPreset::West,
    ];

    /// Legacy integer code.
    pub fn code(self) -> i32 {
        match self {
            ViewPreset::Bottom => 0,
            ViewPreset::North => 1,
            ViewPreset::East => 2,
            ViewPreset::Top => 3,
            ViewPreset::South => 4,
            ViewPreset::West => 5,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ViewPreset::Top => "Northern Hemisphere",
            ViewPreset::Bottom => "Southern Hemisphere",
            ViewPreset::North => "Western Hemisphere",
            ViewPreset::South => "Eastern Hemisphere",
            ViewPreset::East => "Pacific Region",
            ViewPreset::West => "Atlantic Region",
        }
    }

    pub fn rotation(self) -> Rotation {
        match self {
            ViewPreset::Top => Rotation::new(0.0, 0.0, 0.0),
            ViewPreset::Bottom => Rotation::new(0.0, 180.0, 0.0),
            ViewPreset::North => Rotation::new(-90.0, 0.0, 180.0),
            ViewPreset::South => Rotation::new(-90.0, 0.0, 0.0),
            ViewPreset::East => Rotation::new(-90.0, 0.0, -90.0),
            ViewPreset::West => Rotation::new(-90.0, 0.0, 90.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewPreset;
    use foundation::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let d = (a - b).length();
        assert!(d <= eps, "expected {a:?} ~= {b:?} (diff {d})");
    }

    #[test]
    fn codes_round_trip() {
        for preset in ViewPreset::ALL {
            assert_eq!(ViewPreset::from_code(preset.code()), Some(preset));
        }
        assert_eq!(ViewPreset::from_code(6), None);
        assert_eq!(ViewPreset::from_code(-1), None);
    }

    #[test]
    fn each_preset_faces_its_axis() {
        let facing = [
            (ViewPreset::Top, Vec3::new(0.0, 0.0, 1.0)),
            (ViewPreset::Bottom, Vec3::new(0.0, 0.0, -1.0)),
            (ViewPreset::North, Vec3::new(0.0, 1.0, 0.0)),
            (ViewPreset::South, Vec3::new(0.0, -1.0, 0.0)),
            (ViewPreset::East, Vec3::new(1.0, 0.0, 0.0)),
            (ViewPreset::West, Vec3::new(-1.0, 0.0, 0.0)),
        ];
        for (preset, axis) in facing {
            let toward_viewer = preset.rotation().matrix().transform_vector(axis);
            assert_vec_close(toward_viewer, Vec3::new(0.0, 0.0, 1.0), 1e-12);
        }
    }
}
