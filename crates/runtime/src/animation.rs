use foundation::math::{Mat4, Quat, Vec3, decompose};

/// Endpoint of an animation split into the parts that are blended.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Pose {
    orientation: Quat,
    scale: Vec3,
    translation: Vec3,
}

impl Pose {
    fn of(m: &Mat4) -> Option<Self> {
        let parts = decompose(m).ok()?;
        Some(Self {
            orientation: Quat::from_rotation(&parts.rotation.matrix()),
            scale: parts.scale,
            translation: parts.translation,
        })
    }

    fn blend(a: &Self, b: &Self, t: f64) -> Mat4 {
        let scale = a.scale + (b.scale - a.scale) * t;
        let translation = a.translation + (b.translation - a.translation) * t;
        let mut m = Quat::slerp(a.orientation, b.orientation, t)
            .to_mat4()
            .mul(&Mat4::scaling(scale));
        m.m[0][3] = translation.x;
        m.m[1][3] = translation.y;
        m.m[2][3] = translation.z;
        m
    }
}

/// Interpolation between two camera transforms.
///
/// Orientation follows the shorter great-circle arc while scale and
/// translation move linearly, so every intermediate transform is a valid
/// rotation-scale-translation. Transforms that do not decompose are blended
/// element-wise instead. Step `k` of `n` sits at `t = k / n`; the final step
/// yields `to` exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixAnimation {
    from: Mat4,
    to: Mat4,
    poses: Option<(Pose, Pose)>,
    steps: u32,
    step: u32,
}

impl MatrixAnimation {
    pub fn new(from: Mat4, to: Mat4, steps: u32) -> Self {
        let poses = Pose::of(&from).zip(Pose::of(&to));
        Self {
            from,
            to,
            poses,
            steps: steps.max(1),
            step: 0,
        }
    }

    pub fn target(&self) -> &Mat4 {
        &self.to
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn remaining(&self) -> u32 {
        self.steps - self.step
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }

    /// Advances one step and returns the transform to display.
    pub fn next_matrix(&mut self) -> Option<Mat4> {
        if self.is_finished() {
            return None;
        }
        self.step += 1;
        if self.step == self.steps {
            return Some(self.to);
        }
        let t = f64::from(self.step) / f64::from(self.steps);
        Some(match &self.poses {
            Some((a, b)) => Pose::blend(a, b, t),
            None => Mat4::lerp(&self.from, &self.to, t),
        })
    }
}
