//! The animated logo scene.
//!
//! - `animation`: keyframe table, color helpers and the progress-driven
//!   controller
//! - `materials`: the two material backends behind `MaterialManager`
//! - `scene`: scene graph, camera and the scene manager
//! - `renderers`: the two renderers behind `Renderer`
//! - [`GraphicsController`]: wires them together for a host window

pub mod animation;
pub mod materials;
pub mod renderers;
pub mod scene;

mod controller;

pub use controller::{GraphicsController, GraphicsOptions};
