//! wgpu renderers for the 2D draw stream.
//!
//! Conventions:
//! - CPU geometry is in logical pixels (top-left origin, +Y down)
//! - vertex shaders convert to NDC through a viewport uniform
//! - colors are linear premultiplied RGBA
//! - superellipse clips are evaluated per fragment; rect clips use the scissor

mod ctx;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
