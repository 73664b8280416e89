//! Input subsystem.
//!
//! The public API does not expose winit types; the window runtime translates
//! platform events into `InputEvent`s. The scene is driven by a scroll-style
//! progress signal, so wheel deltas are accumulated per frame.

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState, Modifiers, MouseWheelDelta, PointerMoveEvent};
