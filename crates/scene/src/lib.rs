//! Demo scene and the frame-loop context that owns all per-run state.
//!
//! # Invariants
//! - There is no process-wide state: camera, clock and mix live in a [`FrameContext`].
//! - Within a frame, actions are applied before anything reads the camera.
//! - Cube transforms are a pure function of elapsed time.

pub mod clock;
pub mod context;
pub mod cubes;

pub use clock::{FrameClock, FrameConfig};
pub use context::{FrameContext, INITIAL_CAMERA_POSITION, MixCoefficient};
pub use cubes::{CUBE_POSITIONS, CubeInstance, CubeScene};
