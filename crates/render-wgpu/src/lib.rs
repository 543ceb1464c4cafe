//! wgpu render backend for the cube demo.
//!
//! Draws the ten cubes from a [`flycam_render::FrameSnapshot`], each sampling a
//! blend of two textures and tinted by its pulse colour.
//!
//! # Invariants
//! - The renderer only reads snapshots; it never sees the camera or frame context.
//! - A texture that fails to load is replaced, not fatal.

mod context;
mod gpu;
mod shaders;
mod texture;

pub use context::{GpuContext, RenderError};
pub use gpu::WgpuRenderer;
pub use texture::{CubeTextures, Texture, TextureError, TexturePixels};
