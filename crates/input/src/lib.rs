//! Input translation: raw key, cursor and wheel events become per-frame actions.
//!
//! # Invariants
//! - Nothing downstream of this crate sees windowing-system events.
//! - Actions for a frame are drained once, in a fixed order: moves, mix, look, zoom.
//! - Look and zoom deltas accumulate between drains and are never dropped.

pub mod action;
pub mod state;

pub use action::{Action, Key};
pub use state::{InputState, MIX_STEP};
