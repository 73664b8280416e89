//! 2D draw stream for the overlay layer.
//!
//! - renderer-agnostic draw commands
//! - deterministic ordering (z-index, then insertion order)
//! - a clip stack of scissor rects, optionally curved by a superellipse
//! - shape-specific helpers isolated under `draw::shapes`

mod cmd;
mod key;
mod list;
mod z_index;

pub mod shapes;

pub use cmd::DrawCmd;
pub use key::SortKey;
pub use list::{Clip, DrawItem, DrawList, SuperellipseClip};
pub use shapes::Stroke;
pub use z_index::ZIndex;
