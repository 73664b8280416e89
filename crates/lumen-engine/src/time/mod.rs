//! Frame timing.
//!
//! One `FrameClock` per window; `tick()` once per presented frame. The
//! animation layer reads `FrameTime::elapsed_ms` as its high-resolution
//! timestamp.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
