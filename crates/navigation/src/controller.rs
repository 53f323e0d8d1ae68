//! Viewpoint controller: navigation state plus paired UI toggles.
//!
//! Perspective and auto-rotate each have a menu item and a toolbar button
//! that must show the same value. When the controller changes one of these
//! settings it pushes the new value to the widgets, and the widgets report
//! the change back as if the user had clicked. Those echoes arrive while the
//! controller is still inside the call that caused them and are dropped by a
//! guard scoped to that call; anything arriving outside it is user input.

use foundation::Unit;
use runtime::{Event, Frame};
use scene::geo::GeoPoint;
use scene::picking::Projection;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::camera::{CameraNavigator, NavEvent};
use crate::display::DisplayRenderer;
use crate::error::NavigationError;
use crate::preset::ViewPreset;
use crate::rotate::RotateDirection;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleKind {
    Perspective,
    AutoRotate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ToggleEvent {
    pub kind: ToggleKind,
    pub selected: bool,
}

/// Paired toggle widgets (menu item and button) for each [`ToggleKind`].
pub trait ToggleWidgets {
    /// Shows `selected` on every widget of `kind` and returns the change
    /// events the widgets raised while being updated.
    fn sync(&mut self, kind: ToggleKind, selected: bool) -> Vec<ToggleEvent>;
}

/// For controllers without a UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWidgets;

impl ToggleWidgets for NoWidgets {
    fn sync(&mut self, _kind: ToggleKind, _selected: bool) -> Vec<ToggleEvent> {
        Vec::new()
    }
}

/// Kinds whose widgets are being synced; nested syncs stack.
#[derive(Debug, Default)]
struct EchoGuard {
    syncing: Vec<ToggleKind>,
}

impl EchoGuard {
    fn suppresses(&self, kind: ToggleKind) -> bool {
        self.syncing.contains(&kind)
    }

    fn enter(&mut self, kind: ToggleKind) {
        self.syncing.push(kind);
    }

    fn leave(&mut self) {
        self.syncing.pop();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    pub is_perspective: bool,
    pub auto_rotate: bool,
    pub eye_separation: f64,
    pub front_clip_distance: f64,
    pub current_preset: Option<ViewPreset>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Eyes {
    Mono,
    Stereo,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Motion {
    Static,
    AutoRotating,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ViewMode {
    pub eyes: Eyes,
    pub projection: Projection,
    pub motion: Motion,
}

/// Last viewpoint rotation requested by the user.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewpointInfo {
    pub azimuth_deg: f64,
    pub tilt_deg: f64,
}

impl Default for ViewpointInfo {
    fn default() -> Self {
        Self {
            azimuth_deg: 180.0,
            tilt_deg: 45.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalScaleInfo {
    pub min: f64,
    pub max: f64,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Whether the camera transform changed this frame.
    pub changed: bool,
    pub events: Vec<Event<NavEvent>>,
}

pub struct ViewpointController<D: DisplayRenderer, W: ToggleWidgets> {
    navigator: CameraNavigator<D>,
    widgets: W,
    state: NavigationState,
    viewpoint: ViewpointInfo,
    guard: EchoGuard,
    ignored_echoes: u64,
}

impl<D: DisplayRenderer, W: ToggleWidgets> ViewpointController<D, W> {
    pub fn new(navigator: CameraNavigator<D>, widgets: W) -> Self {
        let state = NavigationState {
            is_perspective: navigator.is_perspective(),
            auto_rotate: navigator.is_auto_rotating(),
            eye_separation: navigator.eye_separation(),
            front_clip_distance: navigator.front_clip_distance(),
            current_preset: None,
        };
        let mut controller = Self {
            navigator,
            widgets,
            state,
            viewpoint: ViewpointInfo::default(),
            guard: EchoGuard::default(),
            ignored_echoes: 0,
        };
        controller.sync_widgets(ToggleKind::Perspective, controller.state.is_perspective);
        controller.sync_widgets(ToggleKind::AutoRotate, controller.state.auto_rotate);
        controller
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn view_mode(&self) -> ViewMode {
        ViewMode {
            eyes: if self.navigator.is_stereo() {
                Eyes::Stereo
            } else {
                Eyes::Mono
            },
            projection: self.navigator.projection(),
            motion: if self.state.auto_rotate {
                Motion::AutoRotating
            } else {
                Motion::Static
            },
        }
    }

    pub fn navigator(&self) -> &CameraNavigator<D> {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut CameraNavigator<D> {
        &mut self.navigator
    }

    pub fn widgets(&self) -> &W {
        &self.widgets
    }

    /// Widget echoes dropped so far.
    pub fn ignored_echoes(&self) -> u64 {
        self.ignored_echoes
    }

    /// Entry point for widget change events. Returns whether the event
    /// changed anything.
    pub fn on_toggle(&mut self, event: ToggleEvent) -> bool {
        if self.guard.suppresses(event.kind) {
            self.ignored_echoes += 1;
            debug!(kind = ?event.kind, selected = event.selected, "ignoring widget echo");
            return false;
        }
        match event.kind {
            ToggleKind::Perspective => self.set_perspective_view(event.selected),
            ToggleKind::AutoRotate => self.set_auto_rotate(event.selected),
        }
    }

    fn sync_widgets(&mut self, kind: ToggleKind, selected: bool) {
        self.guard.enter(kind);
        let echoes = self.widgets.sync(kind, selected);
        for echo in echoes {
            self.on_toggle(echo);
        }
        self.guard.leave();
    }

    pub fn set_perspective_view(&mut self, perspective: bool) -> bool {
        if perspective == self.state.is_perspective {
            return false;
        }
        self.state.is_perspective = perspective;
        self.navigator.set_perspective(perspective);
        self.state.front_clip_distance = self.navigator.front_clip_distance();
        self.sync_widgets(ToggleKind::Perspective, perspective);
        true
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) -> bool {
        if enabled == self.state.auto_rotate {
            return false;
        }
        self.state.auto_rotate = enabled;
        self.navigator.set_auto_rotate(enabled);
        self.sync_widgets(ToggleKind::AutoRotate, enabled);
        true
    }

    /// Sets the rotation direction and turns auto-rotation on.
    pub fn set_rotate(&mut self, direction: RotateDirection) {
        self.navigator.set_rotation_multiplier(direction.multiplier());
        self.state.current_preset = None;
        self.set_auto_rotate(true);
    }

    pub fn set_eye_position(&mut self, separation: f64) -> Result<(), NavigationError> {
        self.navigator.set_eye_separation(separation)?;
        self.state.eye_separation = separation;
        Ok(())
    }

    pub fn check_clip_distance(&mut self) {
        self.navigator.check_clip_distance();
        self.state.front_clip_distance = self.navigator.front_clip_distance();
    }

    pub fn set_clip_distance_front(&mut self, distance: f64) {
        self.navigator.set_clip_distance_front(distance);
        self.state.front_clip_distance = self.navigator.front_clip_distance();
    }

    pub fn set_preset_view(&mut self, preset: ViewPreset) -> Result<(), NavigationError> {
        self.navigator.set_preset_view(preset)?;
        self.state.current_preset = Some(preset);
        Ok(())
    }

    /// Unknown codes are ignored.
    pub fn set_view_code(&mut self, code: i32) -> Result<(), NavigationError> {
        match ViewPreset::from_code(code) {
            Some(preset) => self.set_preset_view(preset),
            None => {
                debug!(code, "unknown view code ignored");
                Ok(())
            }
        }
    }

    pub fn set_top_view(&mut self) -> Result<(), NavigationError> {
        self.set_preset_view(ViewPreset::Top)
    }

    pub fn set_bottom_view(&mut self) -> Result<(), NavigationError> {
        self.set_preset_view(ViewPreset::Bottom)
    }

    pub fn set_north_view(&mut self) -> Result<(), NavigationError> {
        self.set_preset_view(ViewPreset::North)
    }

    pub fn set_south_view(&mut self) -> Result<(), NavigationError> {
        self.set_preset_view(ViewPreset::South)
    }

    pub fn set_east_view(&mut self) -> Result<(), NavigationError> {
        self.set_preset_view(ViewPreset::East)
    }

    pub fn set_west_view(&mut self) -> Result<(), NavigationError> {
        self.set_preset_view(ViewPreset::West)
    }

    pub fn center_and_zoom(
        &mut self,
        target: GeoPoint,
        zoom: f64,
        animate: bool,
        north_up: bool,
    ) -> Result<(), NavigationError> {
        self.navigator.center_and_zoom(target, zoom, animate, north_up)?;
        if !target.is_missing() {
            self.state.current_preset = None;
        }
        Ok(())
    }

    pub fn viewpoint_info(&self) -> ViewpointInfo {
        self.viewpoint
    }

    /// Rotates the saved transform to the given azimuth and tilt.
    pub fn set_viewpoint_info(&mut self, info: ViewpointInfo) {
        self.viewpoint = info;
        let saved = self.navigator.display().saved_projection_matrix();
        self.navigator.rotate_view(&saved, info.azimuth_deg, info.tilt_deg);
        self.state.current_preset = None;
    }

    pub fn vertical_scale_info(&self) -> VerticalScaleInfo {
        let mapper = self.navigator.mapper();
        let (min, max) = mapper.vertical_range();
        VerticalScaleInfo {
            min,
            max,
            unit: mapper.vertical_unit(),
        }
    }

    /// Applies unit and range with the display inactive. The display is
    /// reactivated whether or not the values were accepted.
    pub fn apply_vertical_scale(&mut self, info: VerticalScaleInfo) -> Result<(), NavigationError> {
        self.navigator.display_mut().set_display_active(false);
        let result = self
            .navigator
            .apply_vertical_scale(info.unit, info.min, info.max);
        self.navigator.display_mut().set_display_active(true);
        if let Err(e) = &result {
            warn!(error = %e, "vertical scale rejected");
        }
        result
    }

    /// Advances the navigator one frame and hands back the events it raised
    /// since the previous tick.
    pub fn tick(&mut self, frame: Frame) -> Result<TickReport, NavigationError> {
        let changed = self.navigator.tick(frame)?;
        let events = self.navigator.drain_events();
        for event in &events {
            debug!(frame = event.frame_index, event = ?event.payload, "navigation event");
        }
        Ok(TickReport { changed, events })
    }
}
