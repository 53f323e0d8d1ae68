//! Camera transform codec.
//!
//! A camera transform is packed as `M = T * Rx * Ry * Rz * S`: a scale, then
//! rotations about Z, Y and X (degrees), then a translation. [`decompose`]
//! recovers the components and [`compose`] packs them again; the pair
//! round-trips for every transform built this way.

use super::{Mat4, Vec3};

/// Smallest column length accepted as a non-degenerate scale.
const MIN_SCALE: f64 = 1e-12;

/// Tolerance on the bottom row of an affine transform.
const AFFINE_EPS: f64 = 1e-9;

/// Euler-style rotation in degrees, applied as `Rx * Ry * Rz`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rotation {
    pub x_deg: f64,
    pub y_deg: f64,
    pub z_deg: f64,
}

impl Rotation {
    pub const IDENTITY: Self = Self {
        x_deg: 0.0,
        y_deg: 0.0,
        z_deg: 0.0,
    };

    pub fn new(x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        Self {
            x_deg,
            y_deg,
            z_deg,
        }
    }

    pub fn matrix(self) -> Mat4 {
        Mat4::rotation_x(self.x_deg)
            .mul(&Mat4::rotation_y(self.y_deg))
            .mul(&Mat4::rotation_z(self.z_deg))
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Decomposed {
    pub rotation: Rotation,
    pub scale: Vec3,
    pub translation: Vec3,
}

impl Decomposed {
    pub fn compose(&self) -> Mat4 {
        compose(self.rotation, self.scale, self.translation)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DecompositionError {
    NonFinite,
    NotAffine,
    DegenerateScale { axis: usize },
    Reflection,
}

impl std::fmt::Display for DecompositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecompositionError::NonFinite => write!(f, "transform has non-finite elements"),
            DecompositionError::NotAffine => write!(f, "transform is not affine"),
            DecompositionError::DegenerateScale { axis } => {
                write!(f, "transform has zero scale on axis {axis}")
            }
            DecompositionError::Reflection => {
                write!(f, "transform contains a reflection")
            }
        }
    }
}

impl std::error::Error for DecompositionError {}

/// Packs rotation, per-axis scale and translation into a transform.
pub fn compose(rotation: Rotation, scale: Vec3, translation: Vec3) -> Mat4 {
    let mut m = rotation.matrix().mul(&Mat4::scaling(scale));
    m.m[0][3] = translation.x;
    m.m[1][3] = translation.y;
    m.m[2][3] = translation.z;
    m
}

/// Uniform-scale shorthand for [`compose`].
pub fn make_matrix(rotation: Rotation, scale: f64, translation: Vec3) -> Mat4 {
    compose(rotation, Vec3::splat(scale), translation)
}

/// Splits a transform into rotation, scale and translation.
///
/// Scale is the length of each upper-3x3 column, so it is never negative;
/// a transform whose rotation part is a reflection is rejected instead.
pub fn decompose(m: &Mat4) -> Result<Decomposed, DecompositionError> {
    if !m.is_finite() {
        return Err(DecompositionError::NonFinite);
    }
    let bottom = m.m[3];
    if bottom[0].abs() > AFFINE_EPS
        || bottom[1].abs() > AFFINE_EPS
        || bottom[2].abs() > AFFINE_EPS
        || (bottom[3] - 1.0).abs() > AFFINE_EPS
    {
        return Err(DecompositionError::NotAffine);
    }

    let mut r = [[0.0; 3]; 3];
    let mut scale = [0.0; 3];
    for col in 0..3 {
        let c = m.column3(col);
        let len = c.length();
        if len < MIN_SCALE {
            return Err(DecompositionError::DegenerateScale { axis: col });
        }
        scale[col] = len;
        r[0][col] = c.x / len;
        r[1][col] = c.y / len;
        r[2][col] = c.z / len;
    }

    let det = r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
        - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
        + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0]);
    if det < 0.0 {
        return Err(DecompositionError::Reflection);
    }

    Ok(Decomposed {
        rotation: euler_from_rotation(&r),
        scale: Vec3::from_array(scale),
        translation: Vec3::new(m.m[0][3], m.m[1][3], m.m[2][3]),
    })
}

// For R = Rx(a) * Ry(b) * Rz(c):
//   R[0][2] =  sin b
//   R[1][2] = -sin a cos b,  R[2][2] = cos a cos b
//   R[0][1] = -cos b sin c,  R[0][0] = cos b cos c
fn euler_from_rotation(r: &[[f64; 3]; 3]) -> Rotation {
    let cos_b = r[0][0].hypot(r[0][1]);
    let b = r[0][2].atan2(cos_b);

    let (a, c) = if cos_b > 1e-9 {
        ((-r[1][2]).atan2(r[2][2]), (-r[0][1]).atan2(r[0][0]))
    } else {
        // Gimbal lock: only a + c (or a - c) is observable; pin c to zero.
        (r[2][1].atan2(r[1][1]), 0.0)
    };

    Rotation::new(a.to_degrees(), b.to_degrees(), c.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::{DecompositionError, Rotation, compose, decompose, make_matrix};
    use crate::math::{Mat4, Vec3, look_at, mat_approx_eq};

    fn assert_mat_close(a: &Mat4, b: &Mat4, rel: f64) {
        assert!(mat_approx_eq(a, b, rel), "{a:?} != {b:?}");
    }

    #[test]
    fn identity_decomposes_to_unit_components() {
        let d = decompose(&Mat4::IDENTITY).expect("identity");
        assert_eq!(d.rotation, Rotation::IDENTITY);
        assert_eq!(d.scale, Vec3::ONE);
        assert_eq!(d.translation, Vec3::ZERO);
    }

    #[test]
    fn round_trip_over_rotation_grid() {
        let angles = [-170.0, -95.0, -30.0, 0.0, 12.5, 60.0, 135.0];
        let scales = [Vec3::splat(0.5), Vec3::new(0.2, 1.5, 3.0)];
        for &a in &angles {
            for &b in &[-80.0, -45.0, 0.0, 33.0, 89.0] {
                for &c in &angles {
                    for &s in &scales {
                        let m = compose(Rotation::new(a, b, c), s, Vec3::new(0.1, -0.4, 2.0));
                        let d = decompose(&m).expect("decompose");
                        assert_mat_close(&d.compose(), &m, 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn round_trip_at_gimbal_lock() {
        for b in [90.0, -90.0] {
            let m = make_matrix(Rotation::new(25.0, b, 40.0), 0.65, Vec3::ZERO);
            let d = decompose(&m).expect("decompose");
            assert_eq!(d.rotation.z_deg, 0.0);
            assert_mat_close(&d.compose(), &m, 1e-9);
        }
    }

    #[test]
    fn look_at_orientation_round_trips() {
        let m = look_at(
            Vec3::new(0.3, -0.8, 0.52),
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
        );
        let d = decompose(&m).expect("decompose");
        assert!((d.scale.x - 1.0).abs() < 1e-12);
        assert_mat_close(&d.compose(), &m, 1e-9);
    }

    #[test]
    fn recovers_scale_and_translation() {
        let m = compose(
            Rotation::new(10.0, 20.0, 30.0),
            Vec3::new(0.5, 0.25, 2.0),
            Vec3::new(1.0, -2.0, 3.0),
        );
        let d = decompose(&m).expect("decompose");
        assert!((d.scale.x - 0.5).abs() < 1e-12);
        assert!((d.scale.y - 0.25).abs() < 1e-12);
        assert!((d.scale.z - 2.0).abs() < 1e-12);
        assert_eq!(d.translation, Vec3::new(1.0, -2.0, 3.0));
        assert!((d.rotation.x_deg - 10.0).abs() < 1e-9);
        assert!((d.rotation.y_deg - 20.0).abs() < 1e-9);
        assert!((d.rotation.z_deg - 30.0).abs() < 1e-9);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let m = compose(Rotation::IDENTITY, Vec3::new(1.0, 0.0, 1.0), Vec3::ZERO);
        assert_eq!(
            decompose(&m),
            Err(DecompositionError::DegenerateScale { axis: 1 })
        );
    }

    #[test]
    fn reflection_and_projective_inputs_are_rejected() {
        let mirrored = Mat4::scaling(Vec3::new(-1.0, 1.0, 1.0));
        assert_eq!(decompose(&mirrored), Err(DecompositionError::Reflection));

        let mut projective = Mat4::IDENTITY;
        projective.m[3][2] = -1.0;
        assert_eq!(decompose(&projective), Err(DecompositionError::NotAffine));

        let mut nan = Mat4::IDENTITY;
        nan.m[1][1] = f64::NAN;
        assert_eq!(decompose(&nan), Err(DecompositionError::NonFinite));
    }
}
