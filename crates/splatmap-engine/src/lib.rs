//! Splatmap engine crate.
//!
//! GPU paint accumulation onto a persistent splat map, plus a compute-shader
//! reduction that reports how much of the map matches a reference color.

pub mod device;
pub mod logging;
pub mod coords;
pub mod brush;
pub mod paint;
pub mod reduction;
pub mod reference;

mod error;

pub use error::PaintError;

/// Re-exported so mask consumers can name texture views without a direct dependency.
pub use wgpu;
