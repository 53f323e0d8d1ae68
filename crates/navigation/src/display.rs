use foundation::math::{Mat4, Vec3};
use scene::picking::{Projection, Viewport};

use crate::config::DisplayConfig;

/// Renderer capabilities the navigator drives.
///
/// The renderer owns the camera transform; the navigator reads it, computes
/// a new one and hands it back. Nothing here draws.
pub trait DisplayRenderer {
    fn projection_matrix(&self) -> Mat4;
    fn set_projection_matrix(&mut self, matrix: Mat4);

    /// Reference transform recorded by [`DisplayRenderer::save_projection_matrix`].
    fn saved_projection_matrix(&self) -> Mat4;
    fn save_projection_matrix(&mut self);

    fn projection(&self) -> Projection;
    fn set_projection_policy(&mut self, projection: Projection);

    fn front_clip_distance(&self) -> f64;
    fn set_front_clip_distance(&mut self, distance: f64);

    /// Left and right eye positions in view space.
    fn eye_positions(&self) -> (Vec3, Vec3);
    fn set_eye_positions(&mut self, left: Vec3, right: Vec3);

    /// Batches changes: an inactive display defers redraws until reactivated.
    fn set_display_active(&mut self, active: bool);
    fn is_display_active(&self) -> bool;

    fn stereo_available(&self) -> bool;
    fn viewport(&self) -> Viewport;

    /// Last pointer position in pixels, if the pointer is over the display.
    fn cursor_position(&self) -> Option<(f64, f64)>;
}

/// Headless display that only records what it is told.
#[derive(Debug, Clone)]
pub struct OffscreenDisplay {
    matrix: Mat4,
    saved: Mat4,
    projection: Projection,
    front_clip: f64,
    eyes: (Vec3, Vec3),
    active: bool,
    activity: Vec<bool>,
    stereo: bool,
    viewport: Viewport,
    cursor: Option<(f64, f64)>,
}

impl Default for OffscreenDisplay {
    fn default() -> Self {
        Self::new(Viewport::new(600, 400), false)
    }
}

impl OffscreenDisplay {
    pub fn new(viewport: Viewport, stereo: bool) -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            saved: Mat4::IDENTITY,
            projection: Projection::Parallel,
            front_clip: 0.0,
            eyes: (Vec3::ZERO, Vec3::ZERO),
            active: true,
            activity: Vec::new(),
            stereo,
            viewport,
            cursor: None,
        }
    }

    pub fn from_config(config: &DisplayConfig) -> Self {
        let vp = config.viewport;
        Self::new(Viewport::new(vp.width, vp.height), config.stereo)
    }

    pub fn set_cursor_position(&mut self, cursor: Option<(f64, f64)>) {
        self.cursor = cursor;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Every active/inactive switch in call order.
    pub fn activity(&self) -> &[bool] {
        &self.activity
    }
}

impl DisplayRenderer for OffscreenDisplay {
    fn projection_matrix(&self) -> Mat4 {
        self.matrix
    }

    fn set_projection_matrix(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    fn saved_projection_matrix(&self) -> Mat4 {
        self.saved
    }

    fn save_projection_matrix(&mut self) {
        self.saved = self.matrix;
    }

    fn projection(&self) -> Projection {
        self.projection
    }

    fn set_projection_policy(&mut self, projection: Projection) {
        self.projection = projection;
    }

    fn front_clip_distance(&self) -> f64 {
        self.front_clip
    }

    fn set_front_clip_distance(&mut self, distance: f64) {
        self.front_clip = distance;
    }

    fn eye_positions(&self) -> (Vec3, Vec3) {
        self.eyes
    }

    fn set_eye_positions(&mut self, left: Vec3, right: Vec3) {
        self.eyes = (left, right);
    }

    fn set_display_active(&mut self, active: bool) {
        self.active = active;
        self.activity.push(active);
    }

    fn is_display_active(&self) -> bool {
        self.active
    }

    fn stereo_available(&self) -> bool {
        self.stereo
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn cursor_position(&self) -> Option<(f64, f64)> {
        self.cursor
    }
}
