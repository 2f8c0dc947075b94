use glam::{Mat4, Vec3, Vec4};

/// Default look angles: yaw -90° points down -Z, pitch level.
const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const DEFAULT_SPEED: f32 = 2.5;
const DEFAULT_SENSITIVITY: f32 = 0.1;
const DEFAULT_ZOOM: f32 = 45.0;

/// Pitch stays strictly inside ±90° so the front vector never becomes
/// vertical (which would make yaw ill-defined).
const PITCH_LIMIT: f32 = 89.0;

/// Zoom (vertical FOV in degrees) bounds for scroll-wheel zoom.
const ZOOM_MIN: f32 = 1.0;
const ZOOM_MAX: f32 = 45.0;

const ZNEAR: f32 = 0.1;
const ZFAR: f32 = 100.0;

/// Movement directions understood by [`Camera::process_keyboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    /// Move along the front vector.
    Forward,
    /// Move against the front vector.
    Backward,
    /// Strafe against the right vector.
    Left,
    /// Strafe along the right vector.
    Right,
}

/// Free-flying perspective camera.
///
/// Orientation state is always `(yaw, pitch)`; the `front`/`right`/`up`
/// basis is recomputed from scratch on every orientation change rather
/// than integrated incrementally, so it cannot drift.
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Unit vector the camera looks along (derived from yaw/pitch).
    pub front: Vec3,
    /// Camera-local up vector (derived).
    pub up: Vec3,
    /// Camera-local right vector (derived).
    pub right: Vec3,
    /// World up reference used to derive the basis.
    pub world_up: Vec3,
    /// Horizontal look angle in degrees.
    pub yaw: f32,
    /// Vertical look angle in degrees, clamped to ±[`PITCH_LIMIT`].
    pub pitch: f32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Mouse-look sensitivity (degrees per pixel).
    pub sensitivity: f32,
    /// Vertical field of view in degrees; scroll zoom narrows this.
    pub zoom: f32,
}

impl Camera {
    /// Create a camera at the given position with default orientation.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            speed: DEFAULT_SPEED,
            sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// Move the camera along its basis vectors by `speed * dt`.
    ///
    /// No bounds checking: the camera can fly anywhere.
    pub fn process_keyboard(&mut self, direction: CameraMovement, dt: f32) {
        let velocity = self.speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a mouse delta (in pixels, y already flipped so positive looks
    /// up) to yaw/pitch, then rebuild the basis.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch =
            (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Scroll-wheel zoom: narrows or widens the projection FOV.
    pub fn process_mouse_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Point the camera along `front`, converting the direction back to
    /// yaw/pitch so orientation state stays angle-based.
    pub fn look_toward(&mut self, front: Vec3) {
        let dir = front.normalize_or(Vec3::NEG_Z);
        self.yaw = dir.z.atan2(dir.x).to_degrees();
        self.pitch = dir
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// The world-to-camera transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// The camera-to-clip transform for the given aspect ratio.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect, ZNEAR, ZFAR)
    }

    /// Spherical-to-Cartesian conversion from yaw/pitch; the only place
    /// the basis vectors are written.
    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();
        self.front = Vec3::new(
            yaw_cos * pitch_cos,
            pitch_sin,
            yaw_sin * pitch_cos,
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

/// GPU uniform buffer holding the camera matrices and world position.
///
/// The skybox matrix uses a translation-stripped view so the cube stays
/// centered on the eye, and the shader pins its depth to the far plane.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// View-projection with the view translation stripped (skybox pass).
    pub sky_view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl CameraUniform {
    /// Create a new camera uniform with identity matrices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            sky_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            _pad: 0.0,
        }
    }

    /// Update uniform fields from the camera's current state.
    pub fn update(&mut self, camera: &Camera, aspect: f32) {
        let proj = camera.projection_matrix(aspect);
        let view = camera.view_matrix();
        self.view_proj = (proj * view).to_cols_array_2d();

        // Zero the translation column so the skybox follows the eye.
        let mut sky_view = view;
        sky_view.w_axis = Vec4::W;
        self.sky_view_proj = (proj * sky_view).to_cols_array_2d();

        self.position = camera.position.to_array();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn front_is_unit_length_across_orientations() {
        let mut camera = Camera::default();
        for yaw in [-720.0, -90.0, 0.0, 33.3, 180.0, 1234.5] {
            for pitch in [-89.0, -45.0, 0.0, 60.0, 89.0] {
                camera.yaw = yaw;
                camera.pitch = pitch;
                camera.process_mouse_movement(0.0, 0.0);
                assert!(
                    (camera.front.length() - 1.0).abs() < EPS,
                    "front not unit at yaw={yaw} pitch={pitch}"
                );
            }
        }
    }

    #[test]
    fn default_orientation_looks_down_negative_z() {
        let camera = Camera::default();
        assert!((camera.front - Vec3::NEG_Z).length() < EPS);
        assert!((camera.right - Vec3::X).length() < EPS);
        assert!((camera.up - Vec3::Y).length() < EPS);
    }

    #[test]
    fn pitch_pins_at_clamp_bound() {
        let mut camera = Camera::default();
        // 10_000 pixels of upward delta at 0.1 sensitivity would be
        // 1000° of pitch without clamping.
        for _ in 0..100 {
            camera.process_mouse_movement(0.0, 100.0);
        }
        assert_eq!(camera.pitch, 89.0);
        // And back down past the other bound.
        for _ in 0..200 {
            camera.process_mouse_movement(0.0, -100.0);
        }
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn forward_for_one_second_at_default_speed() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, -2.5)).length() < EPS);
    }

    #[test]
    fn strafe_is_along_right_vector() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_keyboard(CameraMovement::Right, 2.0);
        assert!((camera.position - Vec3::new(5.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn scroll_zoom_clamps_at_bounds() {
        let mut camera = Camera::default();
        assert_eq!(camera.zoom, 45.0);
        // Scrolling out (negative dy) cannot widen past the max.
        camera.process_mouse_scroll(-5.0);
        assert_eq!(camera.zoom, 45.0);
        camera.zoom = 40.0;
        camera.process_mouse_scroll(-5.0);
        assert_eq!(camera.zoom, 45.0);
        // Zooming in clamps at the min.
        camera.process_mouse_scroll(100.0);
        assert_eq!(camera.zoom, 1.0);
    }

    #[test]
    fn look_toward_round_trips_front_vector() {
        let mut camera = Camera::default();
        let target = Vec3::new(0.3, -0.4, 0.86).normalize();
        camera.look_toward(target);
        assert!((camera.front - target).length() < 1e-4);
    }

    #[test]
    fn view_matrix_is_pure_function_of_state() {
        let camera = Camera::new(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.view_matrix(), camera.view_matrix());
    }

    #[test]
    fn uniform_strips_translation_for_skybox() {
        let mut camera = Camera::new(Vec3::new(10.0, 5.0, -3.0));
        camera.process_mouse_movement(123.0, -45.0);
        let mut uniform = CameraUniform::new();
        uniform.update(&camera, 1.5);

        let mut at_origin = Camera::new(Vec3::ZERO);
        at_origin.yaw = camera.yaw;
        at_origin.pitch = camera.pitch;
        at_origin.process_mouse_movement(0.0, 0.0);
        let mut origin_uniform = CameraUniform::new();
        origin_uniform.update(&at_origin, 1.5);

        for (a, b) in uniform
            .sky_view_proj
            .iter()
            .flatten()
            .zip(origin_uniform.sky_view_proj.iter().flatten())
        {
            assert!((a - b).abs() < 1e-4);
        }
    }
}
