use flycam_scene::{CubeInstance, FrameContext};
use glam::{Mat4, Vec3, Vec4};

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
/// Background colour, linear RGBA.
pub const CLEAR_COLOR: [f32; 4] = [0.58, 0.54, 0.59, 1.0];

/// Camera/view configuration for rendering, copied out of the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self::capture(&FrameContext::default())
    }
}

impl RenderView {
    pub fn capture(ctx: &FrameContext) -> Self {
        let camera = ctx.camera();
        Self {
            eye: camera.position(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(ctx.aspect(), NEAR_PLANE, FAR_PLANE),
            fov_degrees: camera.field_of_view(),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub view: RenderView,
    pub instances: Vec<CubeInstance>,
    pub mix: f32,
    pub clear_color: [f32; 4],
    pub time: f64,
    pub frame: u64,
}

impl FrameSnapshot {
    pub fn capture(ctx: &FrameContext) -> Self {
        Self {
            view: RenderView::capture(ctx),
            instances: ctx.cube_instances(),
            mix: ctx.mix(),
            clear_color: CLEAR_COLOR,
            time: ctx.clock().elapsed(),
            frame: ctx.clock().frame(),
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given snapshot.
    fn render(&self, frame: &FrameSnapshot) -> Self::Output;
}

/// Whether a clip-space point lies inside the view volume.
///
/// `perspective_rh` maps depth to `[0, w]`, so the near and far planes are
/// `z = 0` and `z = w`.
fn in_view_volume(clip: Vec4) -> bool {
    clip.w > 0.0
        && clip.x.abs() <= clip.w
        && clip.y.abs() <= clip.w
        && clip.z >= 0.0
        && clip.z <= clip.w
}

/// Produces a human-readable description of a frame.
///
/// Used by the CLI for headless runs and by tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameSnapshot) -> String {
        let view = &frame.view;
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} (t={:.3}s) ===\n",
            frame.frame, frame.time
        ));
        out.push_str(&format!(
            "Camera: eye=({:.2}, {:.2}, {:.2}) fov={:.1}\n",
            view.eye.x, view.eye.y, view.eye.z, view.fov_degrees
        ));
        out.push_str(&format!("Mix: {:.2}\n", frame.mix));
        out.push_str(&format!("Cubes: {}\n", frame.instances.len()));

        let view_proj = view.view_projection();
        for (i, instance) in frame.instances.iter().enumerate() {
            let center = instance.model.transform_point3(Vec3::ZERO);
            let clip = view_proj * center.extend(1.0);
            let visibility = if in_view_volume(clip) {
                "visible"
            } else {
                "culled"
            };
            out.push_str(&format!(
                "  [{i}] pos=({:.2}, {:.2}, {:.2}) {visibility}\n",
                center.x, center.y, center.z
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flycam_camera::CameraMovement;
    use flycam_input::Action;

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 45.0);
        assert_eq!(view.eye, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn snapshot_is_detached_from_context() {
        let mut ctx = FrameContext::default();
        let before = FrameSnapshot::capture(&ctx);
        ctx.apply(Action::Move {
            direction: CameraMovement::Forward,
            dt: 1.0,
        });
        ctx.apply(Action::Zoom(10.0));
        let after = FrameSnapshot::capture(&ctx);

        assert_eq!(before.view.fov_degrees, 45.0);
        assert_eq!(after.view.fov_degrees, 35.0);
        assert_ne!(before.view.view, after.view.view);
    }

    #[test]
    fn projection_follows_fov_and_aspect() {
        let mut ctx = FrameContext::default();
        ctx.resize(1920, 1080);
        ctx.apply(Action::Zoom(20.0));
        let view = RenderView::capture(&ctx);
        let expected =
            Mat4::perspective_rh(25.0_f32.to_radians(), 1920.0 / 1080.0, NEAR_PLANE, FAR_PLANE);
        assert_eq!(view.projection, expected);
    }

    #[test]
    fn debug_renderer_lists_cubes() {
        let ctx = FrameContext::default();
        let output = DebugTextRenderer::new().render(&FrameSnapshot::capture(&ctx));

        assert!(output.contains("Cubes: 10"));
        assert!(output.contains("eye=(0.00, 0.00, 3.00)"));
        assert!(output.contains("Mix: 0.50"));
        assert!(output.contains("[9]"));
    }

    #[test]
    fn cubes_past_the_far_plane_are_culled() {
        // Cube 1 sits at z = -15; from z = 200 it is dead ahead but beyond 100 units.
        let far = FrameContext::new(
            flycam_scene::FrameConfig::default(),
            flycam_camera::Camera::at(Vec3::new(2.0, 5.0, 200.0)),
        );
        let output = DebugTextRenderer::new().render(&FrameSnapshot::capture(&far));
        assert!(output.contains("[1] pos=(2.00, 5.00, -15.00) culled"));

        let near = FrameContext::new(
            flycam_scene::FrameConfig::default(),
            flycam_camera::Camera::at(Vec3::new(2.0, 5.0, -5.0)),
        );
        let output = DebugTextRenderer::new().render(&FrameSnapshot::capture(&near));
        assert!(output.contains("[1] pos=(2.00, 5.00, -15.00) visible"));
    }

    #[test]
    fn cube_inside_the_near_plane_is_culled() {
        let clip_behind_near = Vec4::new(0.0, 0.0, -0.01, 0.05);
        assert!(!in_view_volume(clip_behind_near));
        assert!(in_view_volume(Vec4::new(0.0, 0.0, 0.5, 1.0)));
    }

    #[test]
    fn cube_ahead_is_visible_cube_behind_is_culled() {
        let ctx = FrameContext::default();
        let output = DebugTextRenderer::new().render(&FrameSnapshot::capture(&ctx));
        // Cube 0 sits at the origin, straight ahead of the start position.
        assert!(output.contains("[0] pos=(0.00, 0.00, 0.00) visible"));

        let mut ctx = FrameContext::default();
        // Half a turn: 1800 px * 0.1 = 180 degrees of yaw.
        ctx.apply(Action::Look { dx: 1800.0, dy: 0.0 });
        let output = DebugTextRenderer::new().render(&FrameSnapshot::capture(&ctx));
        assert!(output.contains("[0] pos=(0.00, 0.00, 0.00) culled"));
    }
}
