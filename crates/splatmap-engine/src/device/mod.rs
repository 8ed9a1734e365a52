//! Headless GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - checking that the adapter can host splat maps and compute reductions
//! - tracking device loss for the paint and reduction layers
//! - blocking buffer readback shared by queries and debug reads

mod gpu;
mod health;
mod init;
mod readback;

pub use gpu::Gpu;
pub use health::DeviceHealth;
pub use init::GpuInit;

pub(crate) use readback::{align_to, wait_for_map, COPY_BYTES_PER_ROW_ALIGNMENT};
