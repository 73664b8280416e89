//! GPU device + surface management.
//!
//! Acquisition is split in two phases so a renderer can choose whether to
//! block on it:
//! - [`Gpu::prepare`] creates the instance and the window surface (must run on
//!   the thread that owns the window)
//! - [`PendingGpu::connect`] requests the adapter/device and configures the
//!   surface (async; may be driven on a worker thread)

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::{Gpu, PendingGpu};
pub use init::GpuInit;
