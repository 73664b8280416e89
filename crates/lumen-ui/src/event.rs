use lumen_engine::coords::Vec2;

/// Input routed through the widget tree.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Cursor position this frame.
    Hover { pos: Vec2 },
    /// Primary button pressed and released at `pos`.
    Click { pos: Vec2 },
    /// Wheel or trackpad scroll in lines; positive scrolls content down.
    ScrollWheel { delta: f32 },
}

/// Whether a widget handled an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Stop routing.
    Consumed,
    Ignored,
}

impl EventResult {
    #[inline]
    pub fn is_consumed(self) -> bool {
        self == EventResult::Consumed
    }
}
