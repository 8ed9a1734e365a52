//! GPU color coverage reduction.
//!
//! A single compute pass counts texels matching a reference color into one
//! atomic counter, which is read back synchronously and turned into a
//! percentage of the texture area.

mod engine;
mod percent;

pub use engine::{ColorReductionEngine, ReductionConfig};
pub use percent::{coverage_percent, dispatch_size, DEFAULT_MATCH_TOLERANCE, WORKGROUP_SIZE};
