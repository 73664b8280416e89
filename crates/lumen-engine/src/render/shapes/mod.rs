//! Shape renderers. Each consumes one `DrawCmd` variant from a `DrawList`.

mod common;

pub mod path;
pub mod rect;
pub mod text;

pub use path::{PathRenderer, tessellate_fill, tessellate_stroke};
pub use rect::RectRenderer;
pub use text::TextRenderer;
