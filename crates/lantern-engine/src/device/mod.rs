//! GPU device, window surface and depth buffer.
//!
//! `Gpu` negotiates adapter and device, keeps the surface configured to the
//! window size together with a matching depth attachment, and hands out one
//! `GpuFrame` per rendered frame.

mod depth;
mod frame;
mod gpu;
mod init;
mod surface;

pub use depth::DepthBuffer;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
