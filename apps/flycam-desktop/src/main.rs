use anyhow::{Context as _, Result};
use clap::Parser;
use egui::Context as EguiContext;
use flycam_camera::{Camera, SENSITIVITY, SPEED};
use flycam_input::{InputState, Key};
use flycam_render::FrameSnapshot;
use flycam_render_wgpu::{CubeTextures, GpuContext, WgpuRenderer};
use flycam_scene::{FrameConfig, FrameContext, INITIAL_CAMERA_POSITION};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Pixel-precise wheels (touchpads) report pixels; this many make one wheel notch.
const SCROLL_PIXELS_PER_LINE: f64 = 40.0;

#[derive(Parser)]
#[command(name = "flycam-desktop", about = "Fly a camera around ten spinning cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Window width in pixels
    #[arg(long, default_value_t = 1000)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 1000)]
    height: u32,

    /// First cube texture (repeats)
    #[arg(long, default_value = "awesomeface.png")]
    texture1: PathBuf,

    /// Second cube texture (clamped to edge)
    #[arg(long, default_value = "uv_grid_opengl.jpg")]
    texture2: PathBuf,

    /// Camera movement speed in units per second
    #[arg(long, default_value_t = SPEED)]
    speed: f32,

    /// Mouse-look sensitivity in degrees per pixel
    #[arg(long, default_value_t = SENSITIVITY)]
    sensitivity: f32,

    /// Longest frame delta fed to the camera, in seconds
    #[arg(long, default_value_t = 0.1)]
    max_delta: f32,
}

impl Cli {
    fn frame_context(&self) -> FrameContext {
        let config = FrameConfig {
            max_delta: self.max_delta,
            aspect: self.width as f32 / self.height.max(1) as f32,
            ..FrameConfig::default()
        };
        let camera = Camera::at(INITIAL_CAMERA_POSITION)
            .with_movement_speed(self.speed)
            .with_mouse_sensitivity(self.sensitivity);
        FrameContext::new(config, camera)
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F1 => Some(Key::F1),
        _ => None,
    }
}

fn is_pointer_event(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CursorMoved { .. }
            | WindowEvent::CursorEntered { .. }
            | WindowEvent::CursorLeft { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::MouseInput { .. }
    )
}

/// Wheel delta in notches; positive scrolls away from the user.
fn wheel_lines(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => (pos.y / SCROLL_PIXELS_PER_LINE) as f32,
    }
}

/// Application state.
struct AppState {
    frame: FrameContext,
    input: InputState,
    started: Instant,
    cursor_grabbed: bool,
}

impl AppState {
    fn new(frame: FrameContext) -> Self {
        Self {
            frame,
            input: InputState::new(),
            started: Instant::now(),
            cursor_grabbed: false,
        }
    }

    /// Advance the clock and apply this frame's input, before anything is drawn.
    fn update(&mut self) {
        let now = self.started.elapsed().as_secs_f64();
        let dt = self.frame.begin_frame(now);
        let actions = self.input.drain_actions(dt);
        self.frame.apply_all(actions);
    }

    /// Whether egui gets to see `event`. While the cursor is grabbed for
    /// mouse-look the hidden pointer belongs to the camera, so pointer and
    /// wheel events skip the overlay.
    fn egui_receives(&self, event: &WindowEvent) -> bool {
        !(self.cursor_grabbed && is_pointer_event(event))
    }

    /// Feed keyboard, cursor and wheel events to the input layer.
    /// Returns `true` when the event was input and needs no further handling.
    fn handle_input_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                self.handle_key(*key, *state == ElementState::Pressed);
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !self.cursor_grabbed {
                    self.input
                        .cursor_moved(position.x as f32, position.y as f32);
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.input.scroll(wheel_lines(*delta));
                true
            }
            _ => false,
        }
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        let Some(key) = map_key(code) else {
            return;
        };
        if let Some(action) = self.input.handle_key(key, pressed) {
            self.frame.apply(action);
        }
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        if !self.frame.overlay_visible() {
            return;
        }

        let camera = self.frame.camera();
        let clock = self.frame.clock();
        let fps = if clock.delta() > 0.0 {
            1.0 / clock.delta()
        } else {
            0.0
        };

        egui::SidePanel::left("overlay")
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("flycam");
                ui.separator();
                ui.label(format!("Frame: {}  ({fps:.0} fps)", clock.frame()));
                ui.label(format!(
                    "Position: ({:.2}, {:.2}, {:.2})",
                    camera.position().x,
                    camera.position().y,
                    camera.position().z
                ));
                ui.label(format!("Yaw: {:.1}", camera.yaw()));
                ui.label(format!("Pitch: {:.1}", camera.pitch()));
                ui.label(format!("FOV: {:.1}", camera.field_of_view()));
                ui.label(format!("Mix: {:.2}", self.frame.mix()));
                ui.separator();
                ui.small("WASD: Move | Mouse: Look | Wheel: Zoom");
                ui.small("Up/Down: Mix | F1: Overlay | Esc: Quit");
            });
    }
}

struct GpuApp {
    state: AppState,
    window_size: PhysicalSize<u32>,
    texture_paths: (PathBuf, PathBuf),
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
    egui_ctx: EguiContext,
    egui_winit: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
}

impl GpuApp {
    fn new(cli: &Cli) -> Self {
        Self {
            state: AppState::new(cli.frame_context()),
            window_size: PhysicalSize::new(cli.width.max(1), cli.height.max(1)),
            texture_paths: (cli.texture1.clone(), cli.texture2.clone()),
            window: None,
            gpu: None,
            renderer: None,
            egui_ctx: EguiContext::default(),
            egui_winit: None,
            egui_renderer: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let mut attrs = Window::default_attributes()
            .with_title("flycam")
            .with_inner_size(self.window_size);
        if let Some(monitor) = event_loop.primary_monitor() {
            let screen = monitor.size();
            let origin = monitor.position();
            attrs = attrs.with_position(PhysicalPosition::new(
                origin.x + (screen.width as i32 - self.window_size.width as i32) / 2,
                origin.y + (screen.height as i32 - self.window_size.height as i32) / 2,
            ));
        }
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let gpu = GpuContext::new(window.clone(), size.width, size.height)?;

        let (first, second) = &self.texture_paths;
        let textures = CubeTextures::load(&gpu.device, &gpu.queue, first, second);
        let renderer =
            WgpuRenderer::new(&gpu.device, gpu.format(), size.width, size.height, textures);

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&gpu.device, gpu.format(), None, 1, false);

        self.state.frame.resize(size.width, size.height);
        self.grab_cursor(&window);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.egui_winit = Some(egui_winit);
        self.egui_renderer = Some(egui_renderer);
        Ok(())
    }

    /// Hide the cursor and keep it inside the window, preferring a confined grab.
    fn grab_cursor(&mut self, window: &Window) {
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));
        window.set_cursor_visible(false);
        self.state.cursor_grabbed = match grabbed {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("cursor grab unavailable, falling back to cursor tracking: {e}");
                false
            }
        };
        self.state.input.reset_cursor();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop, window: &Window) {
        self.state.update();
        if self.state.frame.quit_requested() {
            event_loop.exit();
            return;
        }

        let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) else {
            return;
        };
        let Some(output) = gpu.acquire_frame() else {
            return;
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let snapshot = FrameSnapshot::capture(&self.state.frame);
        renderer.render(&gpu.device, &gpu.queue, &view, &snapshot);

        if let (Some(egui_winit), Some(egui_renderer)) =
            (&mut self.egui_winit, &mut self.egui_renderer)
        {
            let raw_input = egui_winit.take_egui_input(window);
            let full_output = self.egui_ctx.run(raw_input, |ctx| {
                self.state.draw_ui(ctx);
            });
            egui_winit.handle_platform_output(window, full_output.platform_output);

            let paint_jobs = self
                .egui_ctx
                .tessellate(full_output.shapes, full_output.pixels_per_point);
            let (width, height) = gpu.size();
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [width, height],
                pixels_per_point: full_output.pixels_per_point,
            };

            for (id, image_delta) in &full_output.textures_delta.set {
                egui_renderer.update_texture(&gpu.device, &gpu.queue, *id, image_delta);
            }
            let mut encoder = gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("egui_encoder"),
                });
            egui_renderer.update_buffers(
                &gpu.device,
                &gpu.queue,
                &mut encoder,
                &paint_jobs,
                &screen_descriptor,
            );
            {
                let mut pass = encoder
                    .begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("egui_pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Load,
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    })
                    .forget_lifetime();
                egui_renderer.render(&mut pass, &paint_jobs, &screen_descriptor);
            }
            gpu.queue.submit(std::iter::once(encoder.finish()));
            for id in &full_output.textures_delta.free {
                egui_renderer.free_texture(id);
            }
        }

        output.present();
        window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            tracing::error!("startup failed: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if self.state.egui_receives(&event) {
            if let Some(egui_winit) = &mut self.egui_winit {
                let response = egui_winit.on_window_event(&window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        if self.state.handle_input_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.size();
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, width, height);
                    }
                }
                self.state.frame.resize(new_size.width, new_size.height);
            }
            WindowEvent::Focused(focused) => {
                if focused {
                    self.grab_cursor(&window);
                } else {
                    self.state.input.release_all();
                    self.state.input.reset_cursor();
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop, &window);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        match event {
            DeviceEvent::MouseMotion { delta } if self.state.cursor_grabbed => {
                self.state
                    .input
                    .mouse_motion(delta.0 as f32, delta.1 as f32);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("flycam-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&cli);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flycam_camera::FIELD_OF_VIEW;
    use winit::event::{DeviceId, TouchPhase};

    fn device() -> DeviceId {
        // SAFETY: the id is only carried inside synthetic events, never passed to winit.
        unsafe { DeviceId::dummy() }
    }

    fn wheel(lines: f32) -> WindowEvent {
        WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, lines),
            phase: TouchPhase::Moved,
        }
    }

    fn grabbed_state() -> AppState {
        let mut state = AppState::new(FrameContext::default());
        state.cursor_grabbed = true;
        state
    }

    #[test]
    fn grabbed_wheel_bypasses_overlay_and_zooms() {
        let mut state = grabbed_state();
        let event = wheel(5.0);

        assert!(!state.egui_receives(&event));
        assert!(state.handle_input_event(&event));
        state.update();
        assert_eq!(state.frame.camera().field_of_view(), FIELD_OF_VIEW - 5.0);
    }

    #[test]
    fn grabbed_pointer_events_skip_egui() {
        let state = grabbed_state();
        let moved = WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(100.0, 100.0),
        };
        assert!(!state.egui_receives(&moved));
        assert!(!state.egui_receives(&WindowEvent::CursorLeft {
            device_id: device()
        }));
        assert!(state.egui_receives(&WindowEvent::Focused(true)));
    }

    #[test]
    fn free_cursor_shares_pointer_events_with_egui() {
        let state = AppState::new(FrameContext::default());
        assert!(state.egui_receives(&wheel(1.0)));
    }

    #[test]
    fn pixel_wheel_deltas_become_notches() {
        let delta = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 80.0));
        assert_eq!(wheel_lines(delta), 2.0);
        assert_eq!(wheel_lines(MouseScrollDelta::LineDelta(0.0, -1.5)), -1.5);
    }

    #[test]
    fn grabbed_cursor_moves_are_ignored() {
        let mut state = grabbed_state();
        for x in [10.0, 300.0] {
            let moved = WindowEvent::CursorMoved {
                device_id: device(),
                position: PhysicalPosition::new(x, 0.0),
            };
            assert!(state.handle_input_event(&moved));
        }
        state.update();
        assert_eq!(state.frame.camera().yaw(), flycam_camera::YAW);
    }

    #[test]
    fn cli_defaults_match_demo() {
        let cli = Cli::try_parse_from(["flycam-desktop"]).unwrap();
        assert_eq!((cli.width, cli.height), (1000, 1000));
        assert_eq!(cli.texture1, PathBuf::from("awesomeface.png"));
        assert_eq!(cli.texture2, PathBuf::from("uv_grid_opengl.jpg"));
        assert_eq!(cli.speed, SPEED);
        assert_eq!(cli.sensitivity, SENSITIVITY);
    }

    #[test]
    fn cli_tunables_reach_the_camera() {
        let cli = Cli::try_parse_from([
            "flycam-desktop",
            "--speed",
            "9",
            "--sensitivity",
            "0.5",
            "--width",
            "1600",
            "--height",
            "800",
        ])
        .unwrap();
        let frame = cli.frame_context();
        assert_eq!(frame.camera().movement_speed(), 9.0);
        assert_eq!(frame.camera().mouse_sensitivity(), 0.5);
        assert_eq!(frame.aspect(), 2.0);
    }

    #[test]
    fn bound_keys_map() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::ArrowDown), Some(Key::Down));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn escape_requests_quit() {
        let mut state = AppState::new(FrameContext::default());
        state.handle_key(KeyCode::Escape, true);
        assert!(state.frame.quit_requested());
    }

    #[test]
    fn first_frame_does_not_move() {
        let mut state = AppState::new(FrameContext::default());
        state.handle_key(KeyCode::KeyW, true);
        state.update();
        assert_eq!(state.frame.camera().position(), INITIAL_CAMERA_POSITION);
        assert!(state.input.is_held(Key::W));
    }
}
