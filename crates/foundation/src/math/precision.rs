//! Tolerance policies.
//!
//! Transform comparisons are relative to the largest magnitude involved, so
//! a scaled globe (scale 0.1 or 40) uses the same tolerance as a unit one.

use super::{Mat4, Vec3};

/// `true` when `a` and `b` differ by at most `rel * max(1, |a|, |b|)`.
///
/// NaN never compares equal.
pub fn approx_eq_rel(a: f64, b: f64, rel: f64) -> bool {
    let scale = 1.0_f64.max(a.abs()).max(b.abs());
    (a - b).abs() <= rel * scale
}

pub fn vec_approx_eq(a: Vec3, b: Vec3, rel: f64) -> bool {
    approx_eq_rel(a.x, b.x, rel) && approx_eq_rel(a.y, b.y, rel) && approx_eq_rel(a.z, b.z, rel)
}

/// Element-wise comparison scaled by the largest element of either matrix.
pub fn mat_approx_eq(a: &Mat4, b: &Mat4, rel: f64) -> bool {
    let scale = a
        .m
        .iter()
        .flatten()
        .chain(b.m.iter().flatten())
        .fold(1.0_f64, |acc, v| acc.max(v.abs()));
    a.m.iter()
        .flatten()
        .zip(b.m.iter().flatten())
        .all(|(x, y)| (x - y).abs() <= rel * scale)
}

/// Canonicalize `-0.0` to `0.0` so that reported angles print cleanly.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

#[cfg(test)]
mod tests {
    use super::{approx_eq_rel, canonical_f64, mat_approx_eq, vec_approx_eq};
    use crate::math::{Mat4, Vec3};

    #[test]
    fn relative_tolerance_scales_with_magnitude() {
        assert!(approx_eq_rel(1.0e6, 1.0e6 + 1.0e-4, 1e-9));
        assert!(!approx_eq_rel(1.0, 1.0 + 1.0e-6, 1e-9));
        assert!(!approx_eq_rel(f64::NAN, f64::NAN, 1.0));
    }

    #[test]
    fn vectors_compare_per_component() {
        let a = Vec3::new(0.1, 0.2, 0.3);
        assert!(vec_approx_eq(a, Vec3::new(0.1 + 1e-12, 0.2, 0.3), 1e-9));
        assert!(!vec_approx_eq(a, Vec3::new(0.1, 0.2, 0.31), 1e-9));
    }

    #[test]
    fn matrices_compare_against_largest_element() {
        let a = Mat4::scaling(Vec3::splat(100.0));
        let mut b = a;
        b.m[0][1] = 5e-8;
        assert!(mat_approx_eq(&a, &b, 1e-9));
        b.m[0][1] = 1e-3;
        assert!(!mat_approx_eq(&a, &b, 1e-9));
    }

    #[test]
    fn canonicalizes_negative_zero() {
        assert!(canonical_f64(-0.0).is_sign_positive());
        assert_eq!(canonical_f64(-2.5), -2.5);
    }
}
