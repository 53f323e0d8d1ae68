//! Camera transform policy for a globe display.

use foundation::Unit;
use foundation::math::{Mat4, Rotation, Vec3, compose, decompose, look_at};
use runtime::{AnimationScheduler, Event, EventBus, Frame, MatrixAnimation, RepeatTimer, StampSource};
use scene::geo::{GeoPoint, LatLonBox};
use scene::mapping::{CoordinateMapper, Quantity};
use scene::picking::{Manifold, Projection, RayCaster, pick_ray};
use tracing::{debug, info, warn};

use crate::config::{ClipConfig, DisplayConfig};
use crate::display::DisplayRenderer;
use crate::error::NavigationError;
use crate::preset::ViewPreset;
use crate::stereo::EyePositions;

/// Extra sampling margin around the viewport when bounding the visible area.
const LAT_LON_PAD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    VerticalRangeChanged { min: f64, max: f64, unit: Unit },
    ProjectionChanged { perspective: bool },
    AutoRotateChanged { enabled: bool },
}

/// Drives the camera transform of a [`DisplayRenderer`].
pub struct CameraNavigator<D: DisplayRenderer> {
    display: D,
    mapper: CoordinateMapper,
    field_of_view_deg: f64,
    stereo: bool,
    perspective: bool,
    clip: ClipConfig,
    eye_separation: f64,
    animation_steps: u32,
    scheduler: AnimationScheduler,
    rotation_timer: RepeatTimer,
    rotation_multiplier: Vec3,
    events: EventBus<NavEvent>,
    frame: Frame,
}

impl<D: DisplayRenderer> CameraNavigator<D> {
    /// Installs the initial transform (uniform `initial_scale`) as both the
    /// current and the saved transform, then applies projection, clipping
    /// and eye settings.
    pub fn new(display: D, config: &DisplayConfig) -> Result<Self, NavigationError> {
        config.validate()?;
        let v = &config.vertical;
        let mut mapper = CoordinateMapper::new(v.min, v.max, v.unit)?;
        mapper.set_reference_altitude(config.reference_altitude);
        let [mx, my, mz] = config.rotation.multiplier;

        let mut nav = Self {
            display,
            mapper,
            field_of_view_deg: config.field_of_view_deg,
            stereo: false,
            perspective: false,
            clip: config.clip,
            eye_separation: 0.0,
            animation_steps: config.animation.steps,
            scheduler: AnimationScheduler::new(StampSource::new(), config.animation.step_interval_ms),
            rotation_timer: RepeatTimer::new(config.rotation.delay_ms),
            rotation_multiplier: Vec3::new(mx, my, mz),
            events: EventBus::new(),
            frame: Frame::new(0, 0.0),
        };

        let initial = compose(Rotation::IDENTITY, Vec3::splat(config.initial_scale), Vec3::ZERO);
        nav.display.set_projection_matrix(initial);
        nav.display.save_projection_matrix();

        nav.stereo = config.stereo && nav.display.stereo_available();
        nav.set_perspective(nav.stereo);
        nav.set_eye_separation(config.eye_separation)?;
        nav.events.drain();
        Ok(nav)
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.display.projection_matrix()
    }

    /// Replaces the transform outright, superseding any running animation.
    pub fn set_projection_matrix(&mut self, matrix: Mat4) {
        self.scheduler.supersede();
        self.display.set_projection_matrix(matrix);
    }

    pub fn save_projection_matrix(&mut self) {
        self.display.save_projection_matrix();
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_animating()
    }

    pub fn superseded_animations(&self) -> u64 {
        self.scheduler.superseded_count()
    }

    pub fn events(&self) -> &[Event<NavEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event<NavEvent>> {
        self.events.drain()
    }

    /// Turns the globe so that `target` faces the viewer, scaling by `zoom`.
    ///
    /// A missing target is ignored. A zoom of 0 or NaN counts as 1; negative
    /// or infinite zooms are rejected. The new orientation looks from the
    /// target toward the globe center with north (or south, when `north_up`
    /// is false) at the top; translation is kept. With `animate` the change
    /// is queued and played back by [`Self::tick`].
    pub fn center_and_zoom(
        &mut self,
        target: GeoPoint,
        zoom: f64,
        animate: bool,
        north_up: bool,
    ) -> Result<(), NavigationError> {
        if target.is_missing() {
            debug!("center request without a location ignored");
            return Ok(());
        }
        let zoom = if zoom == 0.0 || zoom.is_nan() { 1.0 } else { zoom };
        if zoom < 0.0 || !zoom.is_finite() {
            return Err(NavigationError::InvalidZoom(zoom));
        }

        let current = self.display.projection_matrix();
        let parts = decompose(&current)?;
        let xyz = self.mapper.geo_to_scene(target)?;
        let up = if north_up {
            Vec3::new(0.0, 0.0, 1.0)
        } else {
            Vec3::new(0.0, 0.0, -1.0)
        };
        let oriented = decompose(&look_at(xyz, Vec3::ZERO, up))?;
        let to = compose(oriented.rotation, parts.scale * zoom, parts.translation);
        // Overflowing scales must not reach the display.
        decompose(&to)?;

        if animate {
            let stamp = self
                .scheduler
                .submit(MatrixAnimation::new(current, to, self.animation_steps));
            debug!(
                stamp = stamp.0,
                lat = target.latitude,
                lon = target.longitude,
                zoom,
                "queued center animation"
            );
        } else {
            self.set_projection_matrix(to);
        }
        Ok(())
    }

    pub fn center(&mut self, target: GeoPoint, animate: bool) -> Result<(), NavigationError> {
        self.center_and_zoom(target, 1.0, animate, true)
    }

    /// Keeps the current rotation and restores scale and translation from the
    /// saved transform.
    pub fn reset_scale_translate(&mut self) -> Result<(), NavigationError> {
        let current = decompose(&self.display.projection_matrix())?;
        let saved = decompose(&self.display.saved_projection_matrix())?;
        self.set_projection_matrix(compose(current.rotation, saved.scale, saved.translation));
        Ok(())
    }

    pub fn set_preset_view(&mut self, preset: ViewPreset) -> Result<(), NavigationError> {
        let current = decompose(&self.display.projection_matrix())?;
        self.set_projection_matrix(compose(preset.rotation(), current.scale, current.translation));
        Ok(())
    }

    /// Preset by legacy code; unknown codes leave the view alone.
    pub fn set_view_code(&mut self, code: i32) -> Result<(), NavigationError> {
        match ViewPreset::from_code(code) {
            Some(preset) => self.set_preset_view(preset),
            None => {
                debug!(code, "unknown view code ignored");
                Ok(())
            }
        }
    }

    /// Whether stereo was requested and the display supports it.
    pub fn is_stereo(&self) -> bool {
        self.stereo
    }

    pub fn is_perspective(&self) -> bool {
        self.perspective
    }

    /// Switches the projection policy; returns whether it changed. The clip
    /// distance is re-checked either way.
    pub fn set_perspective(&mut self, perspective: bool) -> bool {
        let changed = perspective != self.perspective;
        self.perspective = perspective;
        self.display.set_projection_policy(self.projection());
        self.check_clip_distance();
        if changed {
            info!(perspective, "projection changed");
            self.events
                .emit(self.frame, NavEvent::ProjectionChanged { perspective });
        }
        changed
    }

    pub fn projection(&self) -> Projection {
        if self.perspective {
            Projection::Perspective
        } else {
            Projection::Parallel
        }
    }

    /// Perspective uses the fixed perspective front clip; parallel uses the
    /// configured one.
    pub fn check_clip_distance(&mut self) {
        let distance = if self.perspective {
            self.clip.front_perspective
        } else {
            self.clip.front_default
        };
        self.display.set_front_clip_distance(distance);
    }

    pub fn set_clip_distance_front(&mut self, distance: f64) {
        self.clip.front_default = distance;
        self.check_clip_distance();
    }

    pub fn front_clip_distance(&self) -> f64 {
        self.display.front_clip_distance()
    }

    pub fn eye_separation(&self) -> f64 {
        self.eye_separation
    }

    pub fn set_eye_separation(&mut self, separation: f64) -> Result<(), NavigationError> {
        let eyes = EyePositions::from_separation(separation)?;
        self.display.set_eye_positions(eyes.left, eyes.right);
        self.eye_separation = separation;
        Ok(())
    }

    /// Uniform scale of the current transform (x component).
    pub fn scale(&self) -> Result<f64, NavigationError> {
        Ok(decompose(&self.display.projection_matrix())?.scale.x)
    }

    pub fn rotation(&self) -> Result<Rotation, NavigationError> {
        Ok(decompose(&self.display.projection_matrix())?.rotation)
    }

    /// `Rx(tilt) * Rz(180 - azimuth) * matrix` becomes the transform.
    pub fn rotate_view(&mut self, matrix: &Mat4, azimuth_deg: f64, tilt_deg: f64) {
        let combo = Mat4::rotation_z(180.0 - azimuth_deg).mul(matrix);
        self.set_projection_matrix(Mat4::rotation_x(tilt_deg).mul(&combo));
    }

    pub fn rotation_multiplier(&self) -> Vec3 {
        self.rotation_multiplier
    }

    pub fn set_rotation_multiplier(&mut self, multiplier: Vec3) {
        self.rotation_multiplier = multiplier;
    }

    /// One auto-rotation step: the multiplier divided by the current scale, in
    /// degrees, applied in view space.
    pub fn rotate(&mut self) -> Result<(), NavigationError> {
        let current = self.display.projection_matrix();
        let scale = decompose(&current)?.scale.x;
        let m = self.rotation_multiplier;
        let step = Rotation::new(m.x / scale, m.y / scale, m.z / scale).matrix();
        self.display.set_projection_matrix(step.mul(&current));
        Ok(())
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.rotation_timer.is_running()
    }

    /// Returns whether the state changed. Enabling restarts the repeat timer.
    pub fn set_auto_rotate(&mut self, enabled: bool) -> bool {
        if enabled == self.is_auto_rotating() {
            return false;
        }
        if enabled {
            self.rotation_timer.start();
        } else {
            self.rotation_timer.stop();
        }
        info!(enabled, delay_ms = self.rotation_timer.delay_ms(), "auto-rotate changed");
        self.events
            .emit(self.frame, NavEvent::AutoRotateChanged { enabled });
        true
    }

    pub fn rotate_delay_ms(&self) -> u64 {
        self.rotation_timer.delay_ms()
    }

    pub fn set_rotate_delay_ms(&mut self, delay_ms: u64) {
        self.rotation_timer.set_delay_ms(delay_ms);
    }

    pub fn rotate_faster(&mut self) {
        self.rotation_timer.faster();
    }

    pub fn rotate_slower(&mut self) {
        self.rotation_timer.slower();
    }

    fn caster(&self) -> RayCaster {
        RayCaster::new(self.display.viewport(), self.projection(), self.field_of_view_deg)
    }

    /// Geographic point under pixel `(x, y)`, or `None` when the pixel misses
    /// the globe.
    pub fn screen_to_geo(&self, x: f64, y: f64) -> Option<GeoPoint> {
        let camera = self.display.projection_matrix();
        let hit = pick_ray(&self.caster(), &camera, Manifold::GLOBE, x, y).point()?;
        Some(self.mapper.scene_to_geo(hit))
    }

    /// Pixel where display-space `point` appears under the current transform.
    pub fn screen_coordinates(&self, point: Vec3) -> Option<(f64, f64)> {
        self.caster().project(&self.display.projection_matrix(), point)
    }

    /// Display-space point on the globe under the viewport center.
    pub fn center_point(&self) -> Option<Vec3> {
        let (x, y) = self.display.viewport().center();
        let camera = self.display.projection_matrix();
        pick_ray(&self.caster(), &camera, Manifold::GLOBE, x, y).point()
    }

    /// Centers, north up, on whatever lies under pixel `(x, y)`. Returns
    /// `false` when the pixel misses the globe.
    pub fn center_on_pixel(&mut self, x: f64, y: f64, animate: bool) -> Result<bool, NavigationError> {
        let Some(target) = self.screen_to_geo(x, y) else {
            debug!(x, y, "center on empty pixel ignored");
            return Ok(false);
        };
        self.center_and_zoom(target, 1.0, animate, true)?;
        Ok(true)
    }

    pub fn cursor_location(&self) -> Option<GeoPoint> {
        let (x, y) = self.display.cursor_position()?;
        self.screen_to_geo(x, y)
    }

    /// Geographic position of the eye point.
    pub fn viewpoint_location(&self) -> Option<GeoPoint> {
        let inv = self.display.projection_matrix().inverse()?;
        let eye = inv.transform_point(Vec3::new(0.0, 0.0, self.caster().eye_distance()));
        Some(self.mapper.scene_to_geo(eye))
    }

    /// Bounds of the visible part of the globe, padded 2% in longitude.
    ///
    /// The whole world is reported when an edge midpoint of the viewport
    /// misses the globe or all four sit on the equator.
    pub fn lat_lon_box(&self) -> LatLonBox {
        let vp = self.display.viewport();
        let (w, h) = (f64::from(vp.width), f64::from(vp.height));
        let edges = [(w / 2.0, 0.0), (w / 2.0, h), (0.0, h / 2.0), (w, h / 2.0)];
        let mut mids = Vec::with_capacity(edges.len());
        for (x, y) in edges {
            match self.screen_to_geo(x, y) {
                Some(g) => mids.push(g.latitude),
                None => return LatLonBox::WORLD,
            }
        }
        if mids.iter().all(|lat| *lat == 0.0 || lat.is_nan()) {
            return LatLonBox::WORLD;
        }

        let xs = [
            -LAT_LON_PAD, 0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.0 + LAT_LON_PAD,
        ];
        let ys = [-LAT_LON_PAD, 0.0, 0.25, 0.5, 0.75, 1.0, 1.0 + LAT_LON_PAD];
        let grid = ys
            .iter()
            .flat_map(|fy| xs.iter().map(move |fx| (fx * w, fy * h)));
        let mid_row = (0..100u32).map(|i| (f64::from(i) / 100.0 * w, h / 2.0));

        let mut bounds: Option<LatLonBox> = None;
        for (x, y) in grid.chain(mid_row) {
            let Some(g) = self.screen_to_geo(x, y) else {
                continue;
            };
            if g.is_missing() {
                continue;
            }
            let b = bounds.get_or_insert(LatLonBox {
                west: g.longitude,
                south: g.latitude,
                east: g.longitude,
                north: g.latitude,
            });
            b.west = b.west.min(g.longitude);
            b.east = b.east.max(g.longitude);
            b.south = b.south.min(g.latitude);
            b.north = b.north.max(g.latitude);
        }
        let Some(mut b) = bounds else {
            return LatLonBox::WORLD;
        };
        let pad = b.width() * 0.02;
        b.west -= pad;
        b.east += pad;
        b
    }

    pub fn set_vertical_range(&mut self, min: f64, max: f64) -> Result<bool, NavigationError> {
        let changed = self.mapper.set_vertical_range(min, max)?;
        if changed {
            self.publish_vertical_range();
        }
        Ok(changed)
    }

    pub fn set_vertical_range_unit(&mut self, unit: Unit) -> Result<(), NavigationError> {
        let before = self.mapper.revision();
        self.mapper.set_vertical_range_unit(unit)?;
        if self.mapper.revision() != before {
            self.publish_vertical_range();
        }
        Ok(())
    }

    /// Unit and range together; nothing changes unless both are valid.
    pub fn apply_vertical_scale(&mut self, unit: Unit, min: f64, max: f64) -> Result<(), NavigationError> {
        let before = self.mapper.revision();
        self.mapper.apply_vertical_scale(unit, min, max)?;
        if self.mapper.revision() != before {
            self.publish_vertical_range();
        }
        Ok(())
    }

    pub fn add_vertical_map(&mut self, quantity: Quantity) -> Result<(), NavigationError> {
        self.mapper.add_vertical_map(quantity)?;
        Ok(())
    }

    pub fn remove_vertical_map(&mut self, quantity: &Quantity) -> bool {
        self.mapper.remove_vertical_map(quantity)
    }

    fn publish_vertical_range(&mut self) {
        let (min, max) = self.mapper.vertical_range();
        let unit = self.mapper.vertical_unit();
        self.events
            .emit(self.frame, NavEvent::VerticalRangeChanged { min, max, unit });
    }

    /// Advances animation and auto-rotation by one frame; returns whether
    /// the transform changed.
    pub fn tick(&mut self, frame: Frame) -> Result<bool, NavigationError> {
        self.frame = frame;
        let mut changed = false;
        if let Some(step) = self.scheduler.tick(frame) {
            match decompose(&step.matrix) {
                Ok(_) => {
                    self.display.set_projection_matrix(step.matrix);
                    changed = true;
                }
                Err(e) => {
                    warn!(stamp = step.stamp.0, error = %e, "skipping invalid animation frame");
                }
            }
        }
        for _ in 0..self.rotation_timer.tick(frame) {
            self.rotate()?;
            changed = true;
        }
        Ok(changed)
    }
}
