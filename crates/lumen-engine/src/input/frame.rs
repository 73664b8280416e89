use std::collections::HashSet;

use super::types::{InputEvent, Key};

/// Per-frame input deltas. Cleared by the runtime after each frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,
    /// Keys pressed this frame (repeats included).
    pub keys_pressed: HashSet<Key>,
    /// Keys released this frame.
    pub keys_released: HashSet<Key>,
    /// Accumulated vertical wheel distance in logical pixels.
    pub wheel_y: f32,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.wheel_y = 0.0;
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
