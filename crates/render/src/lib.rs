//! Frame snapshots for the cube demo and the renderers that draw them.
//!
//! # Invariants
//! - Renderers receive value snapshots and never touch the frame context.
//! - A snapshot is captured after the frame's input has been applied.
//!
//! The trait is backend-neutral; the wgpu backend and the debug text
//! renderer consume the same [`FrameSnapshot`].

mod renderer;

pub use renderer::{
    CLEAR_COLOR, DebugTextRenderer, FAR_PLANE, FrameSnapshot, NEAR_PLANE, RenderView, Renderer,
};

pub fn crate_info() -> &'static str {
    concat!("flycam-render v", env!("CARGO_PKG_VERSION"))
}
