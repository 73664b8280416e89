//! Lumen engine crate.
//!
//! Platform runtime, GPU device plumbing, the 2D draw stream with its
//! renderers, and the animated 3D logo scene (`graphics`).

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod draw;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;

pub mod graphics;
