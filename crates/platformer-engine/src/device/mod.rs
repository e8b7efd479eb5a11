//! wgpu render context of the desktop backend: one surface per window,
//! cleared and presented once per loop iteration.

mod gpu;
mod surface;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
