use glam::{Mat4, Vec3};

/// Default yaw in degrees. Points the camera down -Z.
pub const YAW: f32 = -90.0;
/// Default pitch in degrees.
pub const PITCH: f32 = 0.0;
/// Default movement speed in units per second.
pub const SPEED: f32 = 4.5;
/// Default scale applied to raw mouse deltas.
pub const SENSITIVITY: f32 = 0.1;
/// Default (and maximum) vertical field of view in degrees.
pub const FIELD_OF_VIEW: f32 = 45.0;

/// Pitch bound in degrees applied by a constrained look.
pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_FIELD_OF_VIEW: f32 = 1.0;
pub const MAX_FIELD_OF_VIEW: f32 = 45.0;

/// Keyboard movement intents, independent of any windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Sines and cosines of the last angle pair the basis was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TrigCache {
    yaw: f32,
    pitch: f32,
    sin_yaw: f32,
    cos_yaw: f32,
    sin_pitch: f32,
    cos_pitch: f32,
}

impl TrigCache {
    fn compute(yaw: f32, pitch: f32) -> Self {
        let (sin_yaw, cos_yaw) = yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = pitch.to_radians().sin_cos();
        Self {
            yaw,
            pitch,
            sin_yaw,
            cos_yaw,
            sin_pitch,
            cos_pitch,
        }
    }

    fn matches(&self, yaw: f32, pitch: f32) -> bool {
        self.yaw == yaw && self.pitch == pitch
    }
}

/// Fly camera driven by Euler angles in degrees.
///
/// Input reaches the camera only through the `process_*` mutators; the basis
/// vectors are rebuilt from yaw and pitch whenever those change, and left alone
/// when they don't. Readers get copies, never references into the camera.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    field_of_view: f32,
    trig: Option<TrigCache>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Y, YAW, PITCH)
    }
}

impl Camera {
    /// Create a camera and build its basis immediately.
    ///
    /// `world_up` is kept as given. A `pitch` of ±90° makes `front` parallel to
    /// a +Y `world_up`, which leaves `right` and `up` as NaN.
    pub fn new(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up,
            yaw,
            pitch,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            field_of_view: FIELD_OF_VIEW,
            trig: None,
        };
        camera.update_camera_vectors();
        camera
    }

    /// Scalar form of [`Camera::new`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_scalars(
        pos_x: f32,
        pos_y: f32,
        pos_z: f32,
        up_x: f32,
        up_y: f32,
        up_z: f32,
        yaw: f32,
        pitch: f32,
    ) -> Self {
        Self::new(
            Vec3::new(pos_x, pos_y, pos_z),
            Vec3::new(up_x, up_y, up_z),
            yaw,
            pitch,
        )
    }

    /// Camera at `position` with the default up, yaw and pitch.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::Y, YAW, PITCH)
    }

    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    /// Vertical field of view in degrees.
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// World-to-camera transform looking from `position` along `front`.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection built from the current field of view.
    pub fn projection_matrix(&self, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(self.field_of_view.to_radians(), aspect, near, far)
    }

    /// Translate along `front` or `right` by `movement_speed * delta_time`.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
        }
    }

    /// Apply a mouse delta in pixels to yaw and pitch, then rebuild the basis.
    ///
    /// Yaw is never wrapped or clamped. With `constrain_pitch` the pitch is held
    /// inside `[-PITCH_LIMIT, PITCH_LIMIT]` so the view cannot flip over.
    pub fn process_mouse_movement(&mut self, xoffset: f32, yoffset: f32, constrain_pitch: bool) {
        self.yaw += xoffset * self.mouse_sensitivity;
        self.pitch += yoffset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_camera_vectors();
    }

    /// Narrow (positive offset) or widen the field of view.
    pub fn process_mouse_scroll(&mut self, yoffset: f32) {
        self.field_of_view =
            (self.field_of_view - yoffset).clamp(MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW);
    }

    fn update_camera_vectors(&mut self) {
        if self
            .trig
            .is_some_and(|trig| trig.matches(self.yaw, self.pitch))
        {
            return;
        }

        let trig = TrigCache::compute(self.yaw, self.pitch);
        self.trig = Some(trig);

        self.front = Vec3::new(
            trig.cos_pitch * trig.cos_yaw,
            trig.sin_pitch,
            trig.cos_pitch * trig.sin_yaw,
        )
        .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();

        tracing::trace!(
            yaw = self.yaw,
            pitch = self.pitch,
            "camera basis rebuilt"
        );
    }
}
