use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState, PointerMoveEvent};

/// Current input state for a single window.
///
/// Holds "is down" information and the pointer position; per-frame
/// transitions go into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: super::Modifiers,
    pub focused: bool,
    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies `ev` to the held state and records deltas into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Avoid stuck keys when focus changes mid-press.
                    self.keys_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, repeat } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) || *repeat {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                frame.wheel_y += delta.vertical_pixels();
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, MouseWheelDelta};

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    #[test]
    fn wheel_deltas_accumulate_in_pixels() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let m = Modifiers::default();
        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y: -1.0 },
            modifiers: m,
        });
        state.apply_event(&mut frame, InputEvent::MouseWheel {
            delta: MouseWheelDelta::Pixel { x: 0.0, y: 15.0 },
            modifiers: m,
        });
        assert_eq!(frame.wheel_y, -25.0);
        frame.clear();
        assert_eq!(frame.wheel_y, 0.0);
    }

    #[test]
    fn key_repeat_counts_as_press() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::ArrowDown, KeyState::Pressed, false));
        frame.clear();
        state.apply_event(&mut frame, key(Key::ArrowDown, KeyState::Pressed, true));
        assert!(frame.keys_pressed.contains(&Key::ArrowDown));
        state.apply_event(&mut frame, key(Key::ArrowDown, KeyState::Released, false));
        assert!(!state.key_down(Key::ArrowDown));
        assert!(frame.keys_released.contains(&Key::ArrowDown));
    }

    #[test]
    fn focus_loss_clears_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, key(Key::Space, KeyState::Pressed, false));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
    }
}
