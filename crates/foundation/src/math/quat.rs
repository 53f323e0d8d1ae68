use super::Mat4;

/// Unit quaternion `(x, y, z, w)` used to blend camera orientations.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Unit quaternion in the same direction, or identity for (near) zero input.
    pub fn normalize(self) -> Self {
        let n = self.dot(self).sqrt();
        if n > 1e-10 {
            Self::new(self.x / n, self.y / n, self.z / n, self.w / n)
        } else {
            Self::IDENTITY
        }
    }

    /// Orientation of the upper 3x3 block, which must be a pure rotation.
    pub fn from_rotation(m: &Mat4) -> Self {
        let r = &m.m;
        let trace = r[0][0] + r[1][1] + r[2][2];
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                (r[2][1] - r[1][2]) / s,
                (r[0][2] - r[2][0]) / s,
                (r[1][0] - r[0][1]) / s,
                0.25 * s,
            )
        } else if r[0][0] > r[1][1] && r[0][0] > r[2][2] {
            let s = (1.0 + r[0][0] - r[1][1] - r[2][2]).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (r[0][1] + r[1][0]) / s,
                (r[0][2] + r[2][0]) / s,
                (r[2][1] - r[1][2]) / s,
            )
        } else if r[1][1] > r[2][2] {
            let s = (1.0 + r[1][1] - r[0][0] - r[2][2]).sqrt() * 2.0;
            Self::new(
                (r[0][1] + r[1][0]) / s,
                0.25 * s,
                (r[1][2] + r[2][1]) / s,
                (r[0][2] - r[2][0]) / s,
            )
        } else {
            let s = (1.0 + r[2][2] - r[0][0] - r[1][1]).sqrt() * 2.0;
            Self::new(
                (r[0][2] + r[2][0]) / s,
                (r[1][2] + r[2][1]) / s,
                0.25 * s,
                (r[1][0] - r[0][1]) / s,
            )
        };
        q.normalize()
    }

    pub fn to_mat4(self) -> Mat4 {
        let Self { x, y, z, w } = self;
        Mat4::from_rows([
            [1.0 - 2.0 * (y * y + z * z), 2.0 * (x * y - z * w), 2.0 * (x * z + y * w), 0.0],
            [2.0 * (x * y + z * w), 1.0 - 2.0 * (x * x + z * z), 2.0 * (y * z - x * w), 0.0],
            [2.0 * (x * z - y * w), 2.0 * (y * z + x * w), 1.0 - 2.0 * (x * x + y * y), 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Spherical interpolation along the shorter arc.
    pub fn slerp(a: Self, b: Self, t: f64) -> Self {
        let mut b = b;
        let mut dot = a.dot(b);
        if dot < 0.0 {
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
            dot = -dot;
        }

        // Nearly parallel: fall back to normalized lerp.
        if dot > 0.9995 {
            return Self::new(
                a.x + t * (b.x - a.x),
                a.y + t * (b.y - a.y),
                a.z + t * (b.z - a.z),
                a.w + t * (b.w - a.w),
            )
            .normalize();
        }

        let theta_0 = dot.clamp(-1.0, 1.0).acos();
        let theta = theta_0 * t;
        let sin_theta_0 = theta_0.sin();
        let s0 = (theta_0 - theta).sin() / sin_theta_0;
        let s1 = theta.sin() / sin_theta_0;
        Self::new(
            s0 * a.x + s1 * b.x,
            s0 * a.y + s1 * b.y,
            s0 * a.z + s1 * b.z,
            s0 * a.w + s1 * b.w,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Quat;
    use crate::math::{Mat4, Rotation, mat_approx_eq};

    #[test]
    fn rotation_matrix_round_trips() {
        for rotation in [
            Rotation::new(0.0, 0.0, 0.0),
            Rotation::new(30.0, -45.0, 110.0),
            Rotation::new(179.0, 2.0, -90.0),
            Rotation::new(0.0, 0.0, 180.0),
            Rotation::new(180.0, 0.0, 0.0),
        ] {
            let m = rotation.matrix();
            let back = Quat::from_rotation(&m).to_mat4();
            assert!(mat_approx_eq(&back, &m, 1e-12), "{rotation:?}");
        }
    }

    #[test]
    fn slerp_halves_a_half_turn() {
        let a = Quat::from_rotation(&Mat4::IDENTITY);
        let b = Quat::from_rotation(&Mat4::rotation_z(180.0));
        let mid = Quat::slerp(a, b, 0.5).to_mat4();
        let quarter = Mat4::rotation_z(90.0);
        let back = Mat4::rotation_z(-90.0);
        assert!(mat_approx_eq(&mid, &quarter, 1e-12) || mat_approx_eq(&mid, &back, 1e-12));
    }

    #[test]
    fn slerp_hits_endpoints() {
        let a = Quat::from_rotation(&Mat4::rotation_x(20.0));
        let b = Quat::from_rotation(&Mat4::rotation_y(-70.0));
        assert!(mat_approx_eq(&Quat::slerp(a, b, 0.0).to_mat4(), &a.to_mat4(), 1e-12));
        assert!(mat_approx_eq(&Quat::slerp(a, b, 1.0).to_mat4(), &b.to_mat4(), 1e-12));
    }
}
