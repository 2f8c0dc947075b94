//! Isleview binary: window creation and the winit event loop.

use std::sync::Arc;
use std::time::Instant;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

use isleview::camera::CameraMovement;
use isleview::engine::Engine;
use isleview::error::IsleError;

/// Movement keys currently held; applied every frame scaled by dt.
#[derive(Default)]
struct HeldKeys {
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
}

#[derive(Default)]
struct App {
    window: Option<Arc<Window>>,
    engine: Option<Engine>,
    held: HeldKeys,
    last_frame: Option<Instant>,
    init_failed: bool,
}

/// Capture the cursor for mouse-look, or release it for the overlay.
fn set_cursor_captured(window: &Window, captured: bool) {
    if captured {
        // Confined keeps the cursor in the window; Locked is the
        // fallback on platforms that only support one of the two.
        if window.set_cursor_grab(CursorGrabMode::Confined).is_err()
            && window.set_cursor_grab(CursorGrabMode::Locked).is_err()
        {
            log::warn!("cursor grab not supported on this platform");
        }
        window.set_cursor_visible(false);
    } else {
        if window.set_cursor_grab(CursorGrabMode::None).is_err() {
            log::warn!("cursor release not supported on this platform");
        }
        window.set_cursor_visible(true);
    }
}

impl App {
    fn save_and_exit(&self, event_loop: &ActiveEventLoop) {
        if let Some(engine) = &self.engine {
            if let Err(e) = engine.save_state() {
                log::error!("failed to persist settings: {e}");
            }
        }
        event_loop.exit();
    }

    fn handle_key(
        &mut self,
        event_loop: &ActiveEventLoop,
        event: &KeyEvent,
    ) {
        let pressed = event.state == ElementState::Pressed;
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match code {
            KeyCode::Escape if pressed => self.save_and_exit(event_loop),
            KeyCode::F1 if pressed && !event.repeat => {
                if let (Some(engine), Some(window)) =
                    (self.engine.as_mut(), self.window.as_ref())
                {
                    let overlay_visible = engine.toggle_overlay();
                    set_cursor_captured(window, !overlay_visible);
                }
            }
            // The flashlight is lit only while E is held.
            KeyCode::KeyE => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.set_lamp(pressed);
                }
            }
            KeyCode::KeyW | KeyCode::ArrowUp => self.held.forward = pressed,
            KeyCode::KeyS | KeyCode::ArrowDown => self.held.backward = pressed,
            KeyCode::KeyA | KeyCode::ArrowLeft => self.held.left = pressed,
            KeyCode::KeyD | KeyCode::ArrowRight => self.held.right = pressed,
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or(0.0, |last| now.duration_since(last).as_secs_f32());
        self.last_frame = Some(now);

        if self.held.forward {
            engine.apply_movement(CameraMovement::Forward, dt);
        }
        if self.held.backward {
            engine.apply_movement(CameraMovement::Backward, dt);
        }
        if self.held.left {
            engine.apply_movement(CameraMovement::Left, dt);
        }
        if self.held.right {
            engine.apply_movement(CameraMovement::Right, dt);
        }

        match engine.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    engine.resize(size.width, size.height);
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("surface out of memory, shutting down");
                self.save_and_exit(event_loop);
                return;
            }
            Err(e) => log::warn!("dropped frame: {e}"),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.engine.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Isleview")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("window creation failed: {e}");
                self.init_failed = true;
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Engine::new(window.clone())) {
            Ok(engine) => {
                set_cursor_captured(&window, true);
                self.window = Some(window);
                self.engine = Some(engine);
            }
            Err(e) => {
                log::error!("initialization failed: {e}");
                self.init_failed = true;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // The overlay sees events first; ones it consumes (typing into a
        // slider, dragging a color picker) must not also steer the camera.
        let consumed = self
            .engine
            .as_mut()
            .is_some_and(|engine| engine.overlay_event(&event));
        if consumed
            && !matches!(
                event,
                WindowEvent::CloseRequested
                    | WindowEvent::Resized(_)
                    | WindowEvent::RedrawRequested
            )
        {
            return;
        }

        match event {
            WindowEvent::CloseRequested => self.save_and_exit(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key(event_loop, &event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(engine) = self.engine.as_mut() {
                    engine.handle_mouse_move(
                        position.x as f32,
                        position.y as f32,
                    );
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 20.0) as f32,
                };
                if let Some(engine) = self.engine.as_mut() {
                    engine.handle_scroll(dy);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

fn main() -> Result<(), IsleError> {
    env_logger::init();

    let event_loop = EventLoop::new()
        .map_err(|e| IsleError::Viewer(format!("event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::default();
    event_loop
        .run_app(&mut app)
        .map_err(|e| IsleError::Viewer(format!("event loop: {e}")))?;

    if app.init_failed {
        return Err(IsleError::Viewer("startup failed, see log".into()));
    }
    Ok(())
}
