use super::Vec3;

/// Relative determinant below which [`Mat4::inverse`] reports a singular matrix.
const SINGULAR_REL: f64 = 1e-12;

/// Row-major 4x4 homogeneous transform (`m[row][col]`).
///
/// Points are column vectors: `p' = M * p`. The flat layout returned by
/// [`Mat4::to_row_major`] matches the 16-element projection matrix that
/// display renderers exchange.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat4 {
    pub m: [[f64; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn from_row_major(v: [f64; 16]) -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, value) in v.iter().enumerate() {
            m[i / 4][i % 4] = *value;
        }
        Self { m }
    }

    pub fn to_row_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.m[row][col];
            }
        }
        out
    }

    pub fn translation(t: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][3] = t.x;
        out.m[1][3] = t.y;
        out.m[2][3] = t.z;
        out
    }

    pub fn scaling(s: Vec3) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0][0] = s.x;
        out.m[1][1] = s.y;
        out.m[2][2] = s.z;
        out
    }

    pub fn rotation_x(deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Matrix product `self * rhs` (apply `rhs` first).
    pub fn mul(&self, rhs: &Self) -> Self {
        let mut c = [[0.0; 4]; 4];
        for (row, out_row) in c.iter_mut().enumerate() {
            for (col, out) in out_row.iter_mut().enumerate() {
                *out = (0..4).map(|k| self.m[row][k] * rhs.m[k][col]).sum();
            }
        }
        Self { m: c }
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.m;
        let x = m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3];
        let y = m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3];
        let z = m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3];
        let w = m[3][0] * p.x + m[3][1] * p.y + m[3][2] * p.z + m[3][3];
        if w != 0.0 && w != 1.0 {
            Vec3::new(x / w, y / w, z / w)
        } else {
            Vec3::new(x, y, z)
        }
    }

    /// Applies the linear part only (no translation).
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        let m = &self.m;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Column `col` of the upper 3x3 block.
    pub fn column3(&self, col: usize) -> Vec3 {
        Vec3::new(self.m[0][col], self.m[1][col], self.m[2][col])
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// General inverse via cofactor expansion; `None` when singular or so
    /// close to singular that the result would be meaningless.
    pub fn inverse(&self) -> Option<Self> {
        let a = self.to_row_major();
        let norm = a.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        let mut inv = [0.0; 16];

        inv[0] = a[5] * a[10] * a[15] - a[5] * a[11] * a[14] - a[9] * a[6] * a[15]
            + a[9] * a[7] * a[14]
            + a[13] * a[6] * a[11]
            - a[13] * a[7] * a[10];
        inv[4] = -a[4] * a[10] * a[15] + a[4] * a[11] * a[14] + a[8] * a[6] * a[15]
            - a[8] * a[7] * a[14]
            - a[12] * a[6] * a[11]
            + a[12] * a[7] * a[10];
        inv[8] = a[4] * a[9] * a[15] - a[4] * a[11] * a[13] - a[8] * a[5] * a[15]
            + a[8] * a[7] * a[13]
            + a[12] * a[5] * a[11]
            - a[12] * a[7] * a[9];
        inv[12] = -a[4] * a[9] * a[14] + a[4] * a[10] * a[13] + a[8] * a[5] * a[14]
            - a[8] * a[6] * a[13]
            - a[12] * a[5] * a[10]
            + a[12] * a[6] * a[9];
        inv[1] = -a[1] * a[10] * a[15] + a[1] * a[11] * a[14] + a[9] * a[2] * a[15]
            - a[9] * a[3] * a[14]
            - a[13] * a[2] * a[11]
            + a[13] * a[3] * a[10];
        inv[5] = a[0] * a[10] * a[15] - a[0] * a[11] * a[14] - a[8] * a[2] * a[15]
            + a[8] * a[3] * a[14]
            + a[12] * a[2] * a[11]
            - a[12] * a[3] * a[10];
        inv[9] = -a[0] * a[9] * a[15] + a[0] * a[11] * a[13] + a[8] * a[1] * a[15]
            - a[8] * a[3] * a[13]
            - a[12] * a[1] * a[11]
            + a[12] * a[3] * a[9];
        inv[13] = a[0] * a[9] * a[14] - a[0] * a[10] * a[13] - a[8] * a[1] * a[14]
            + a[8] * a[2] * a[13]
            + a[12] * a[1] * a[10]
            - a[12] * a[2] * a[9];
        inv[2] = a[1] * a[6] * a[15] - a[1] * a[7] * a[14] - a[5] * a[2] * a[15]
            + a[5] * a[3] * a[14]
            + a[13] * a[2] * a[7]
            - a[13] * a[3] * a[6];
        inv[6] = -a[0] * a[6] * a[15] + a[0] * a[7] * a[14] + a[4] * a[2] * a[15]
            - a[4] * a[3] * a[14]
            - a[12] * a[2] * a[7]
            + a[12] * a[3] * a[6];
        inv[10] = a[0] * a[5] * a[15] - a[0] * a[7] * a[13] - a[4] * a[1] * a[15]
            + a[4] * a[3] * a[13]
            + a[12] * a[1] * a[7]
            - a[12] * a[3] * a[5];
        inv[14] = -a[0] * a[5] * a[14] + a[0] * a[6] * a[13] + a[4] * a[1] * a[14]
            - a[4] * a[2] * a[13]
            - a[12] * a[1] * a[6]
            + a[12] * a[2] * a[5];
        inv[3] = -a[1] * a[6] * a[11] + a[1] * a[7] * a[10] + a[5] * a[2] * a[11]
            - a[5] * a[3] * a[10]
            - a[9] * a[2] * a[7]
            + a[9] * a[3] * a[6];
        inv[7] = a[0] * a[6] * a[11] - a[0] * a[7] * a[10] - a[4] * a[2] * a[11]
            + a[4] * a[3] * a[10]
            + a[8] * a[2] * a[7]
            - a[8] * a[3] * a[6];
        inv[11] = -a[0] * a[5] * a[11] + a[0] * a[7] * a[9] + a[4] * a[1] * a[11]
            - a[4] * a[3] * a[9]
            - a[8] * a[1] * a[7]
            + a[8] * a[3] * a[5];
        inv[15] = a[0] * a[5] * a[10] - a[0] * a[6] * a[9] - a[4] * a[1] * a[10]
            + a[4] * a[2] * a[9]
            + a[8] * a[1] * a[6]
            - a[8] * a[2] * a[5];

        let det = a[0] * inv[0] + a[1] * inv[4] + a[2] * inv[8] + a[3] * inv[12];
        // det scales with the fourth power of the entries.
        if !det.is_finite() || det.abs() <= SINGULAR_REL * norm.powi(4) {
            return None;
        }
        let inv_det = 1.0 / det;
        for v in &mut inv {
            *v *= inv_det;
        }
        Some(Self::from_row_major(inv))
    }

    /// Element-wise linear interpolation, `t = 0` gives `a`, `t = 1` gives `b`.
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        let mut out = [[0.0; 4]; 4];
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, v) in out_row.iter_mut().enumerate() {
                *v = a.m[row][col] + t * (b.m[row][col] - a.m[row][col]);
            }
        }
        Self { m: out }
    }
}

/// View transform looking from `eye` toward `center`.
///
/// Rows are `(side, up, forward)` with `forward = eye - center`, which is
/// the convention of the scene graph's `lookAt`. A zero-length forward or
/// an `up` parallel to it leaves zero rows, which later fail decomposition.
pub fn look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4 {
    let forward = (eye - center).normalize();
    let side = up.cross(forward).normalize();
    let new_up = forward.cross(side);

    Mat4::from_rows([
        [side.x, side.y, side.z, -side.dot(eye)],
        [new_up.x, new_up.y, new_up.z, -new_up.dot(eye)],
        [forward.x, forward.y, forward.z, -forward.dot(eye)],
        [0.0, 0.0, 0.0, 1.0],
    ])
}

#[cfg(test)]
mod tests {
    use super::{Mat4, look_at};
    use crate::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let d = (a - b).length();
        assert!(d <= eps, "expected {a:?} ~= {b:?} (diff {d})");
    }

    #[test]
    fn row_major_layout_round_trips() {
        let flat: [f64; 16] = core::array::from_fn(|i| i as f64);
        let m = Mat4::from_row_major(flat);
        assert_eq!(m.m[0][3], 3.0);
        assert_eq!(m.m[3][0], 12.0);
        assert_eq!(m.to_row_major(), flat);
    }

    #[test]
    fn translation_moves_points_not_vectors() {
        let t = Mat4::translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_point(Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.transform_vector(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let r = Mat4::rotation_z(90.0);
        assert_vec_close(
            r.transform_point(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(0.0, 1.0, 0.0),
            1e-12,
        );
    }

    #[test]
    fn inverse_undoes_affine_transform() {
        let m = Mat4::translation(Vec3::new(0.3, -0.2, 1.5))
            .mul(&Mat4::rotation_x(30.0))
            .mul(&Mat4::rotation_z(-75.0))
            .mul(&Mat4::scaling(Vec3::new(0.5, 0.5, 2.0)));
        let inv = m.inverse().expect("invertible");
        let p = Vec3::new(0.7, -1.1, 0.25);
        assert_vec_close(inv.transform_point(m.transform_point(p)), p, 1e-12);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Mat4::scaling(Vec3::new(1.0, 0.0, 1.0));
        assert!(m.inverse().is_none());
    }

    #[test]
    fn near_singular_matrix_has_no_inverse() {
        let flat = Mat4::scaling(Vec3::new(1.0, 1e-15, 1.0));
        assert!(flat.inverse().is_none());

        let big = Mat4::scaling(Vec3::splat(40.0));
        assert!(big.inverse().is_some());
        let small = Mat4::scaling(Vec3::splat(0.01));
        assert!(small.inverse().is_some());
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Mat4::IDENTITY;
        let b = Mat4::scaling(Vec3::splat(3.0));
        assert_eq!(Mat4::lerp(&a, &b, 0.0), a);
        assert_eq!(Mat4::lerp(&a, &b, 1.0), b);
        assert_eq!(Mat4::lerp(&a, &b, 0.5).m[0][0], 2.0);
    }

    #[test]
    fn look_at_brings_eye_direction_toward_viewer() {
        let m = look_at(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, 1.0),
        );
        // The eye direction maps to +Z (toward the viewer), north to screen up.
        let rot = Mat4 {
            m: [
                [m.m[0][0], m.m[0][1], m.m[0][2], 0.0],
                [m.m[1][0], m.m[1][1], m.m[1][2], 0.0],
                [m.m[2][0], m.m[2][1], m.m[2][2], 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        };
        assert_vec_close(
            rot.transform_point(Vec3::new(1.0, 0.0, 0.0)),
            Vec3::new(0.0, 0.0, 1.0),
            1e-12,
        );
        assert_vec_close(
            rot.transform_point(Vec3::new(0.0, 0.0, 1.0)),
            Vec3::new(0.0, 1.0, 0.0),
            1e-12,
        );
    }

    #[test]
    fn look_at_with_parallel_up_is_degenerate() {
        let m = look_at(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(m.column3(0), Vec3::ZERO);
    }
}
