use std::collections::HashSet;

use glam::Vec2;

use crate::action::{Action, Key};

/// Mix coefficient change per frame while Up or Down is held.
pub const MIX_STEP: f32 = 0.01;

/// Movement keys in the order their actions are emitted.
const MOVEMENT_KEYS: [Key; 4] = [Key::W, Key::S, Key::A, Key::D];

/// Input accumulated between two frames.
///
/// Held keys produce actions every frame; pointer and wheel deltas are summed
/// until [`InputState::drain_actions`] hands them out.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    last_cursor: Option<Vec2>,
    look: Vec2,
    scroll: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Record a key transition. Returns the one-shot action a fresh press triggers.
    pub fn handle_key(&mut self, key: Key, pressed: bool) -> Option<Action> {
        if !pressed {
            self.held.remove(&key);
            return None;
        }

        let fresh = self.held.insert(key);
        match key {
            Key::Escape => Some(Action::Quit),
            Key::F1 if fresh => Some(Action::ToggleOverlay),
            _ => None,
        }
    }

    /// Absolute cursor position in window pixels.
    ///
    /// The first sample after construction or [`InputState::reset_cursor`] only
    /// seeds the reference point, so a cursor that enters far from the last
    /// position does not snap the view.
    pub fn cursor_moved(&mut self, x: f32, y: f32) {
        let pos = Vec2::new(x, y);
        if let Some(last) = self.last_cursor {
            // Window y grows downward; looking up wants a positive offset.
            self.look += Vec2::new(pos.x - last.x, last.y - pos.y);
        }
        self.last_cursor = Some(pos);
    }

    /// Raw relative device motion, y growing downward.
    pub fn mouse_motion(&mut self, dx: f32, dy: f32) {
        self.look += Vec2::new(dx, -dy);
    }

    /// Vertical wheel delta; positive scrolls away from the user.
    pub fn scroll(&mut self, dy: f32) {
        self.scroll += dy;
    }

    /// Forget the last cursor position, e.g. after focus loss.
    pub fn reset_cursor(&mut self) {
        self.last_cursor = None;
    }

    /// Release every held key, e.g. after focus loss.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Produce this frame's actions and clear the accumulated deltas.
    pub fn drain_actions(&mut self, dt: f32) -> Vec<Action> {
        let mut actions = Vec::new();

        for key in MOVEMENT_KEYS {
            if let Some(direction) = key.movement().filter(|_| self.is_held(key)) {
                actions.push(Action::Move { direction, dt });
            }
        }

        if self.is_held(Key::Up) {
            actions.push(Action::AdjustMix(MIX_STEP));
        }
        if self.is_held(Key::Down) {
            actions.push(Action::AdjustMix(-MIX_STEP));
        }

        let look = std::mem::take(&mut self.look);
        if look != Vec2::ZERO {
            actions.push(Action::Look {
                dx: look.x,
                dy: look.y,
            });
        }

        let scroll = std::mem::take(&mut self.scroll);
        if scroll != 0.0 {
            actions.push(Action::Zoom(scroll));
        }

        if !actions.is_empty() {
            tracing::trace!(count = actions.len(), "input actions drained");
        }
        actions
    }
}
