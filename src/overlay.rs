//! Debug overlay: an egui settings window painted at the end of the
//! frame pass.
//!
//! The overlay owns the egui context and its wgpu renderer; the engine
//! hands it mutable references to the live settings each frame, so edits
//! apply immediately with no event plumbing.

use egui_wgpu::ScreenDescriptor;
use winit::window::Window;

use crate::camera::Camera;
use crate::gpu::context::RenderContext;
use crate::gpu::texture;
use crate::lighting::{PointLight, SpotLight};

/// Live settings the overlay edits in place.
pub struct OverlayParams<'a> {
    /// Background clear color.
    pub clear_color: &'a mut [f32; 3],
    /// The chest point light (attenuation is editable).
    pub point: &'a mut PointLight,
    /// The camera flashlight (cone angles are editable).
    pub spot: &'a mut SpotLight,
    /// Whether mouse motion drives the camera.
    pub mouse_look: &'a mut bool,
    /// Read-only camera state for the info readout.
    pub camera: &'a Camera,
}

/// Tessellated output of one overlay frame, consumed by
/// [`Overlay::paint`] and [`Overlay::finish`].
pub struct OverlayFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    screen: ScreenDescriptor,
    free_textures: Vec<egui::TextureId>,
}

/// The egui context, winit bridge, and wgpu renderer for the overlay.
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    /// Toggled with the overlay key; persisted across runs.
    pub enabled: bool,
}

impl Overlay {
    /// Build the egui stack against the window and surface format.
    #[must_use]
    pub fn new(window: &Window, context: &RenderContext) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );
        // Depth format must match the frame pass attachment since the
        // overlay paints inside that pass.
        let renderer = egui_wgpu::Renderer::new(
            &context.device,
            context.format(),
            egui_wgpu::RendererOptions {
                msaa_samples: 1,
                depth_stencil_format: Some(texture::DEPTH_FORMAT),
                dithering: false,
                predictable_texture_filtering: false,
            },
        );
        Self {
            ctx,
            state,
            renderer,
            enabled: false,
        }
    }

    /// Feed a window event to egui. Returns whether egui consumed it.
    pub fn on_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.state.on_window_event(window, event);
        self.enabled && response.consumed
    }

    /// Run the UI and upload its meshes and textures. Returns `None`
    /// while the overlay is hidden.
    pub fn prepare(
        &mut self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        params: &mut OverlayParams<'_>,
    ) -> Option<OverlayFrame> {
        if !self.enabled {
            return None;
        }

        let raw_input = self.state.take_egui_input(window);
        let output = self.ctx.run(raw_input, |ctx| {
            Self::ui(ctx, params);
        });
        self.state
            .handle_platform_output(window, output.platform_output);

        let primitives = self
            .ctx
            .tessellate(output.shapes, output.pixels_per_point);
        let screen = ScreenDescriptor {
            size_in_pixels: [context.config.width, context.config.height],
            pixels_per_point: output.pixels_per_point,
        };

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(
                &context.device,
                &context.queue,
                *id,
                delta,
            );
        }
        self.renderer.update_buffers(
            &context.device,
            &context.queue,
            encoder,
            &primitives,
            &screen,
        );

        Some(OverlayFrame {
            primitives,
            screen,
            free_textures: output.textures_delta.free,
        })
    }

    /// Paint the tessellated overlay into the frame pass.
    pub fn paint(
        &self,
        pass: &mut wgpu::RenderPass<'static>,
        frame: &OverlayFrame,
    ) {
        self.renderer.render(pass, &frame.primitives, &frame.screen);
    }

    /// Release textures egui retired this frame. Call after submit.
    pub fn finish(&mut self, frame: OverlayFrame) {
        for id in frame.free_textures {
            self.renderer.free_texture(&id);
        }
    }

    fn ui(ctx: &egui::Context, params: &mut OverlayParams<'_>) {
        egui::Window::new("Scene Settings")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Background");
                    ui.color_edit_button_rgb(params.clear_color);
                });

                ui.separator();
                ui.label("Chest light attenuation");
                ui.add(
                    egui::Slider::new(&mut params.point.constant, 0.1..=2.0)
                        .text("constant"),
                );
                ui.add(
                    egui::Slider::new(&mut params.point.linear, 0.0..=2.0)
                        .text("linear"),
                );
                ui.add(
                    egui::Slider::new(&mut params.point.quadratic, 0.0..=4.0)
                        .text("quadratic"),
                );

                ui.separator();
                ui.label("Flashlight cone (degrees)");
                let mut inner = params.spot.cut_off();
                let mut outer = params.spot.outer_cut_off();
                ui.add(
                    egui::Slider::new(&mut inner, 1.0..=45.0).text("inner"),
                );
                ui.add(
                    egui::Slider::new(&mut outer, 1.0..=60.0).text("outer"),
                );
                params.spot.set_cut_off(inner, outer);

                ui.separator();
                ui.checkbox(params.mouse_look, "Mouse look");

                ui.separator();
                let p = params.camera.position;
                ui.label(format!(
                    "Camera ({:.2}, {:.2}, {:.2})",
                    p.x, p.y, p.z
                ));
                let f = params.camera.front;
                ui.label(format!(
                    "Front ({:.2}, {:.2}, {:.2})",
                    f.x, f.y, f.z
                ));
                ui.label(format!(
                    "Yaw {:.1}°  Pitch {:.1}°  FOV {:.1}°",
                    params.camera.yaw,
                    params.camera.pitch,
                    params.camera.zoom
                ));
            });
    }
}
