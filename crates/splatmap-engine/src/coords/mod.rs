//! Coordinate and color types shared by the paint and reduction layers.
//!
//! Canonical surface space:
//! - Normalized UV in [0, 1]
//! - Origin top-left of texel (0, 0)
//! - +U right, +V down
//!
//! Pixel space is UV scaled by the splat map size; texel centers sit at
//! half-integer positions, matching fragment `@builtin(position)`.

mod color;
mod vec2;

pub use color::ColorRgba;
pub use vec2::Vec2;
