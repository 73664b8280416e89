/// Keyboard keys the studio shell reacts to.
///
/// Unmapped keys carry the platform code in `Unknown`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    Home,
    End,
    PageUp,
    PageDown,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` comes from notched wheels; `Pixel` from touchpads (logical pixels).
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Logical pixels per wheel line.
    pub const LINE_HEIGHT: f32 = 40.0;

    /// Vertical scroll distance in logical pixels (positive = content moves down).
    pub fn vertical_pixels(self) -> f32 {
        match self {
            MouseWheelDelta::Line { y, .. } => y * Self::LINE_HEIGHT,
            MouseWheelDelta::Pixel { y, .. } => y,
        }
    }
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),
    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        repeat: bool,
    },
    PointerMoved(PointerMoveEvent),
    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },
    /// Pointer left the window surface.
    PointerLeft,
    /// Window focus change.
    Focused(bool),
}
