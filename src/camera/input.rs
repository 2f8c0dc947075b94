use glam::Vec2;

use super::core::Camera;

/// Converts absolute cursor positions into look deltas for a [`Camera`].
///
/// The first sample after construction or after re-enabling is discarded:
/// there is no previous position to difference against, and applying it
/// would snap the view. While disabled (the debug overlay has focus),
/// positions are still tracked but the camera is not updated.
pub struct MouseLook {
    last_pos: Option<Vec2>,
    enabled: bool,
}

impl MouseLook {
    /// Create an enabled mouse-look tracker with no prior sample.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_pos: None,
            enabled: true,
        }
    }

    /// Whether camera updates are currently applied.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Gate mouse-look on or off. Re-enabling discards the next sample so
    /// the cursor travel accumulated while suspended does not snap the view.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.last_pos = None;
        }
        self.enabled = enabled;
    }

    /// Feed an absolute cursor position; applies the delta to `camera`
    /// when enabled. Screen y grows downward, so the pitch delta is
    /// inverted before it reaches the camera.
    pub fn cursor_moved(&mut self, camera: &mut Camera, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        let Some(last) = self.last_pos else {
            self.last_pos = Some(pos);
            return;
        };
        let dx = pos.x - last.x;
        let dy = last.y - pos.y;
        self.last_pos = Some(pos);

        if self.enabled {
            camera.process_mouse_movement(dx, dy);
        }
    }
}

impl Default for MouseLook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn first_sample_is_discarded() {
        let mut look = MouseLook::new();
        let mut camera = Camera::default();
        let yaw = camera.yaw;
        look.cursor_moved(&mut camera, 500.0, 300.0);
        assert_eq!(camera.yaw, yaw);
        // Second sample applies the delta.
        look.cursor_moved(&mut camera, 510.0, 300.0);
        assert!((camera.yaw - (yaw + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn disabled_gate_suppresses_camera_updates() {
        let mut look = MouseLook::new();
        let mut camera = Camera::new(Vec3::ZERO);
        look.cursor_moved(&mut camera, 0.0, 0.0);
        look.set_enabled(false);
        let yaw = camera.yaw;
        look.cursor_moved(&mut camera, 100.0, 50.0);
        assert_eq!(camera.yaw, yaw);
    }

    #[test]
    fn reenabling_discards_next_sample() {
        let mut look = MouseLook::new();
        let mut camera = Camera::default();
        look.cursor_moved(&mut camera, 0.0, 0.0);
        look.set_enabled(false);
        look.set_enabled(true);
        let yaw = camera.yaw;
        // Cursor jumped far while suspended; this sample must not snap.
        look.cursor_moved(&mut camera, 900.0, 900.0);
        assert_eq!(camera.yaw, yaw);
    }

    #[test]
    fn upward_cursor_motion_raises_pitch() {
        let mut look = MouseLook::new();
        let mut camera = Camera::default();
        look.cursor_moved(&mut camera, 100.0, 100.0);
        // Moving the cursor up the screen (smaller y) should look up.
        look.cursor_moved(&mut camera, 100.0, 50.0);
        assert!(camera.pitch > 0.0);
    }
}
