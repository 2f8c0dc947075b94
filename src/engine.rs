//! The top-level viewer: owns the GPU context, scene, lighting,
//! renderer, and overlay, and exposes the handful of operations the
//! event loop drives.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::window::Window;

use crate::camera::{Camera, CameraMovement, MouseLook};
use crate::error::IsleError;
use crate::gpu::context::RenderContext;
use crate::gpu::mesh::GpuMesh;
use crate::lighting::Lighting;
use crate::overlay::{Overlay, OverlayParams};
use crate::renderer::{FrameParams, FrameRenderer};
use crate::scene::{layout, MeshSlot, SceneObject};
use crate::state::{PersistedState, STATE_FILE};

/// Composes every subsystem and runs one frame at a time.
pub struct Engine {
    window: Arc<Window>,
    context: RenderContext,
    /// The fly camera; the event loop feeds it movement directly.
    pub camera: Camera,
    mouse_look: MouseLook,
    lighting: Lighting,
    renderer: FrameRenderer,
    overlay: Overlay,
    meshes: Vec<Vec<GpuMesh>>,
    opaque: Vec<SceneObject>,
    diamonds: Vec<Vec3>,
    clear_color: [f32; 3],
    start: Instant,
}

impl Engine {
    /// Initialize the GPU, load every asset, and restore persisted
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns [`IsleError::Gpu`] when the surface, adapter, or device
    /// cannot be created. Asset failures are not errors; they degrade to
    /// placeholders.
    pub async fn new(window: Arc<Window>) -> Result<Self, IsleError> {
        let persisted = PersistedState::load(Path::new(STATE_FILE));

        let size = window.inner_size();
        let context =
            RenderContext::new(window.clone(), (size.width, size.height))
                .await?;

        let lighting = Lighting::new(&context);
        let renderer = FrameRenderer::new(&context, &lighting);

        let meshes: Vec<Vec<GpuMesh>> = [
            MeshSlot::Island,
            MeshSlot::Dragon,
            MeshSlot::Portal,
            MeshSlot::Key,
            MeshSlot::Chest,
            MeshSlot::Diamond,
        ]
        .into_iter()
        .map(|slot| {
            crate::assets::load_slot(&context, renderer.material_layout(), slot)
        })
        .collect();

        let mut camera = Camera::new(persisted.camera_position);
        camera.look_toward(persisted.camera_front);

        let mut overlay = Overlay::new(&window, &context);
        overlay.enabled = persisted.overlay_enabled;
        // While the overlay is up the cursor belongs to it, not the view.
        let mut mouse_look = MouseLook::new();
        mouse_look.set_enabled(!overlay.enabled);

        Ok(Self {
            window,
            context,
            camera,
            mouse_look,
            lighting,
            renderer,
            overlay,
            meshes,
            opaque: layout::opaque_objects(),
            diamonds: layout::diamond_positions(),
            clear_color: persisted.clear_color,
            start: Instant::now(),
        })
    }

    /// Reconfigure the surface and depth buffer for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.renderer.resize(&self.context);
    }

    /// Apply one held movement key for this frame's delta time.
    pub fn apply_movement(&mut self, direction: CameraMovement, dt: f32) {
        self.camera.process_keyboard(direction, dt);
    }

    /// Feed an absolute cursor position to mouse-look.
    pub fn handle_mouse_move(&mut self, x: f32, y: f32) {
        self.mouse_look.cursor_moved(&mut self.camera, x, y);
    }

    /// Scroll-wheel zoom.
    pub fn handle_scroll(&mut self, dy: f32) {
        self.camera.process_mouse_scroll(dy);
    }

    /// Switch the camera flashlight on or off.
    pub fn set_lamp(&mut self, on: bool) {
        self.lighting.spot.on = on;
    }

    /// Toggle the debug overlay. Returns the new visibility; the caller
    /// releases or grabs the cursor accordingly.
    pub fn toggle_overlay(&mut self) -> bool {
        self.overlay.enabled = !self.overlay.enabled;
        self.mouse_look.set_enabled(!self.overlay.enabled);
        self.overlay.enabled
    }

    /// Let the overlay see a window event first. Returns `true` when the
    /// overlay consumed it.
    pub fn overlay_event(&mut self, event: &winit::event::WindowEvent) -> bool {
        self.overlay.on_window_event(&self.window, event)
    }

    /// Render one frame.
    ///
    /// # Errors
    ///
    /// Propagates [`wgpu::SurfaceError`] so the event loop can decide
    /// between reconfigure and shutdown.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let elapsed = self.start.elapsed().as_secs_f32();

        self.renderer.update_camera(
            &self.context.queue,
            &self.camera,
            self.context.aspect(),
        );
        self.lighting.update_gpu(&self.context.queue, &self.camera);

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        let mut mouse_look_enabled = self.mouse_look.enabled();
        let overlay_frame = self.overlay.prepare(
            &self.context,
            &mut encoder,
            &self.window,
            &mut OverlayParams {
                clear_color: &mut self.clear_color,
                point: &mut self.lighting.point,
                spot: &mut self.lighting.spot,
                mouse_look: &mut mouse_look_enabled,
                camera: &self.camera,
            },
        );
        self.mouse_look.set_enabled(mouse_look_enabled);

        let params = FrameParams {
            camera: &self.camera,
            lighting: &self.lighting,
            meshes: &self.meshes,
            opaque: &self.opaque,
            diamonds: &self.diamonds,
            elapsed,
            clear_color: self.clear_color,
        };
        let overlay = &self.overlay;
        self.renderer.record(
            &self.context,
            &mut encoder,
            &view,
            &params,
            |pass| {
                if let Some(overlay_frame) = &overlay_frame {
                    overlay.paint(pass, overlay_frame);
                }
            },
        );

        self.context.submit(encoder);
        frame.present();

        if let Some(overlay_frame) = overlay_frame {
            self.overlay.finish(overlay_frame);
        }
        Ok(())
    }

    /// Write the current settings to disk for the next run.
    ///
    /// # Errors
    ///
    /// Returns [`IsleError::Io`] when the state file cannot be written.
    pub fn save_state(&self) -> Result<(), IsleError> {
        PersistedState {
            clear_color: self.clear_color,
            overlay_enabled: self.overlay.enabled,
            camera_position: self.camera.position,
            camera_front: self.camera.front,
        }
        .save(Path::new(STATE_FILE))
    }
}
