//! First-person camera: Euler angles in, orthonormal view basis and view matrix out.
//!
//! # Invariants
//! - `front`, `right` and `up` are unit length and pairwise orthogonal whenever read.
//! - Pitch stays inside `[-PITCH_LIMIT, PITCH_LIMIT]` after a constrained look.
//! - Field of view stays inside `[MIN_FIELD_OF_VIEW, MAX_FIELD_OF_VIEW]`.
//! - The basis is derived from `(yaw, pitch, world_up)` only; callers never set it.

mod camera;

pub use camera::{
    Camera, CameraMovement, FIELD_OF_VIEW, MAX_FIELD_OF_VIEW, MIN_FIELD_OF_VIEW, PITCH,
    PITCH_LIMIT, SENSITIVITY, SPEED, YAW,
};
