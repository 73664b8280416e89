//! Paint model shared between the UI layer and the 2D overlay renderers.
//!
//! Colors are linear premultiplied RGBA. Hex parsing lives here so every
//! consumer (material colors, squircle borders, text gradients) resolves a
//! string color the same way.

pub mod color;
pub mod gradient;
mod paint;

pub use color::{parse_hex_rgb, Color};
pub use gradient::{ColorStop, LinearGradient};
pub use paint::Paint;
