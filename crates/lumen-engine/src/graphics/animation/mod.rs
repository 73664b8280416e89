//! Keyframe table, color helpers and the controller that interpolates them.

pub mod color;
pub mod keyframes;

mod controller;

pub use controller::{AnimationController, KeyframeSample, SceneObjects, gradient_uniforms, sample};
pub use keyframes::{AnimationState, KEYFRAMES};
