//! Camera system for flying through the scene.
//!
//! Provides a yaw/pitch free camera with keyboard movement, mouse-look,
//! and scroll-wheel FOV zoom.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Cursor-delta tracking and the mouse-look gate.
pub mod input;

pub use core::{Camera, CameraMovement, CameraUniform};
pub use input::MouseLook;
