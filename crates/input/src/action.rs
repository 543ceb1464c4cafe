use flycam_camera::CameraMovement;

/// Keys the demo binds. Windowing backends map their own key codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Escape,
    F1,
}

impl Key {
    /// Camera movement bound to this key, if any.
    pub fn movement(self) -> Option<CameraMovement> {
        match self {
            Key::W => Some(CameraMovement::Forward),
            Key::S => Some(CameraMovement::Backward),
            Key::A => Some(CameraMovement::Left),
            Key::D => Some(CameraMovement::Right),
            _ => None,
        }
    }
}

/// A high-level action produced by the input layer.
///
/// The frame context consumes actions, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Translate the camera for `dt` seconds.
    Move { direction: CameraMovement, dt: f32 },
    /// Mouse-look by a pixel delta; `dy` is positive when looking up.
    Look { dx: f32, dy: f32 },
    /// Scroll-wheel delta; positive narrows the field of view.
    Zoom(f32),
    /// Shift the texture mix coefficient.
    AdjustMix(f32),
    /// Show or hide the debug overlay.
    ToggleOverlay,
    /// Close the window and leave the frame loop.
    Quit,
}
