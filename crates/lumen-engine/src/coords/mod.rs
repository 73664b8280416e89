//! Screen-space geometry shared by the 2D overlay renderers and the UI layer.
//!
//! Logical pixels, origin top-left, +Y down. Shaders map to NDC through a
//! viewport uniform. World-space (3D) math lives in `graphics` and uses `glam`.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::{CanvasMetrics, Viewport};
