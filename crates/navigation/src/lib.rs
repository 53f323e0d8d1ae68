//! Camera navigation over a globe display.
//!
//! [`CameraNavigator`] owns the camera transform policy (centering, presets,
//! clipping, stereo eyes, auto-rotation and animation) and reaches the
//! renderer only through [`DisplayRenderer`]. [`ViewpointController`] sits
//! above it and keeps UI toggles in step with the navigation state.

pub mod camera;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod preset;
pub mod rotate;
pub mod stereo;

pub use camera::*;
pub use config::*;
pub use controller::*;
pub use display::*;
pub use error::*;
pub use preset::*;
pub use rotate::*;
pub use stereo::*;
