use flycam_camera::Camera;
use flycam_input::Action;
use glam::Vec3;

use crate::clock::{FrameClock, FrameConfig};
use crate::cubes::{CubeInstance, CubeScene};

/// Where the camera starts: three units back from the first cube.
pub const INITIAL_CAMERA_POSITION: Vec3 = Vec3::new(0.0, 0.0, 3.0);

/// Blend factor between the two cube textures, held in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixCoefficient(f32);

impl Default for MixCoefficient {
    fn default() -> Self {
        Self(0.5)
    }
}

impl MixCoefficient {
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn adjust(&mut self, delta: f32) {
        self.0 = (self.0 + delta).clamp(0.0, 1.0);
    }
}

/// Everything one run of the demo mutates, owned by the frame loop.
///
/// Each frame: [`FrameContext::begin_frame`], then [`FrameContext::apply`] for
/// every input action, then the renderer reads a snapshot.
#[derive(Debug, Clone)]
pub struct FrameContext {
    camera: Camera,
    scene: CubeScene,
    mix: MixCoefficient,
    clock: FrameClock,
    aspect: f32,
    overlay_visible: bool,
    quit_requested: bool,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new(FrameConfig::default(), Camera::at(INITIAL_CAMERA_POSITION))
    }
}

impl FrameContext {
    pub fn new(config: FrameConfig, camera: Camera) -> Self {
        Self {
            camera,
            scene: CubeScene::default(),
            mix: MixCoefficient::new(config.initial_mix),
            clock: FrameClock::new(config.max_delta),
            aspect: config.aspect,
            overlay_visible: true,
            quit_requested: false,
        }
    }

    pub fn with_scene(mut self, scene: CubeScene) -> Self {
        self.scene = scene;
        self
    }

    /// Advance the clock to `now` seconds. Returns this frame's delta.
    pub fn begin_frame(&mut self, now: f64) -> f32 {
        self.clock.advance(now)
    }

    /// Route one input action to the state it drives.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Move { direction, dt } => self.camera.process_keyboard(direction, dt),
            Action::Look { dx, dy } => self.camera.process_mouse_movement(dx, dy, true),
            Action::Zoom(delta) => self.camera.process_mouse_scroll(delta),
            Action::AdjustMix(delta) => self.mix.adjust(delta),
            Action::ToggleOverlay => {
                self.overlay_visible = !self.overlay_visible;
                tracing::debug!(visible = self.overlay_visible, "overlay toggled");
            }
            Action::Quit => {
                self.quit_requested = true;
                tracing::info!("quit requested");
            }
        }
    }

    pub fn apply_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        for action in actions {
            self.apply(action);
        }
    }

    /// Track the viewport shape. Zero-sized viewports (minimized windows) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &CubeScene {
        &self.scene
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn mix(&self) -> f32 {
        self.mix.value()
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Cube transforms and tints at the current clock time.
    pub fn cube_instances(&self) -> Vec<CubeInstance> {
        self.scene.instances(self.clock.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flycam_camera::{CameraMovement, FIELD_OF_VIEW, SPEED};

    #[test]
    fn default_context_matches_demo_start() {
        let ctx = FrameContext::default();
        assert_eq!(ctx.camera().position(), INITIAL_CAMERA_POSITION);
        assert!(ctx.camera().front().abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert_eq!(ctx.mix(), 0.5);
        assert_eq!(ctx.cube_instances().len(), 10);
        assert!(ctx.overlay_visible());
        assert!(!ctx.quit_requested());
    }

    #[test]
    fn move_action_drives_camera() {
        let mut ctx = FrameContext::default();
        ctx.apply(Action::Move {
            direction: CameraMovement::Forward,
            dt: 0.5,
        });
        let expected = INITIAL_CAMERA_POSITION + Vec3::NEG_Z * SPEED * 0.5;
        assert!(ctx.camera().position().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn look_action_is_pitch_constrained() {
        let mut ctx = FrameContext::default();
        ctx.apply(Action::Look {
            dx: 0.0,
            dy: 10_000.0,
        });
        assert_eq!(ctx.camera().pitch(), 89.0);
    }

    #[test]
    fn zoom_action_narrows_field_of_view() {
        let mut ctx = FrameContext::default();
        ctx.apply(Action::Zoom(5.0));
        assert_eq!(ctx.camera().field_of_view(), FIELD_OF_VIEW - 5.0);
    }

    #[test]
    fn mix_is_clamped() {
        let mut ctx = FrameContext::default();
        ctx.apply_all(std::iter::repeat_n(Action::AdjustMix(0.01), 80));
        assert_eq!(ctx.mix(), 1.0);
        ctx.apply_all(std::iter::repeat_n(Action::AdjustMix(-0.01), 150));
        assert_eq!(ctx.mix(), 0.0);
    }

    #[test]
    fn initial_mix_is_clamped() {
        assert_eq!(MixCoefficient::new(3.0).value(), 1.0);
        assert_eq!(MixCoefficient::new(-1.0).value(), 0.0);
    }

    #[test]
    fn toggles_and_quit() {
        let mut ctx = FrameContext::default();
        ctx.apply(Action::ToggleOverlay);
        assert!(!ctx.overlay_visible());
        ctx.apply(Action::Quit);
        assert!(ctx.quit_requested());
    }

    #[test]
    fn resize_tracks_aspect_and_ignores_zero() {
        let mut ctx = FrameContext::default();
        ctx.resize(1600, 800);
        assert_eq!(ctx.aspect(), 2.0);
        ctx.resize(0, 800);
        assert_eq!(ctx.aspect(), 2.0);
    }

    #[test]
    fn cubes_animate_with_the_clock() {
        let mut ctx = FrameContext::default();
        ctx.begin_frame(0.0);
        let first = ctx.cube_instances();
        ctx.begin_frame(0.05);
        let second = ctx.cube_instances();
        assert_ne!(first[1].model, second[1].model);
    }
}
