//! Brush session state and the radial falloff kernel.
//!
//! `BrushState` is the persistent configuration mutated by setters; `Stamp`
//! is the immutable snapshot handed to the blend pass for one paint call.

mod falloff;
mod state;

pub use falloff::{falloff, stamp_weight};
pub use state::{
    BrushState, Stamp, DEFAULT_HARDNESS, MAX_BRUSH_SIZE, MAX_BRUSH_STRENGTH, MIN_BRUSH_SIZE,
    MIN_BRUSH_STRENGTH,
};
