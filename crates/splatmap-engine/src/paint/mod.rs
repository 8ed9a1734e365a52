//! Paint accumulation onto a persistent splat map.
//!
//! Every stamp is a copy-then-blend: the splat map is copied into a pooled
//! scratch target, then a full-screen pass reads the scratch copy and writes
//! the blended result back into the splat map. Reading and writing the same
//! texture inside one pass is never done.

mod blend;
mod full_texture;
mod mask;
mod scratch;
mod splat_map;
mod surface;

pub use full_texture::FullTexture;
pub use mask::{MaskBinding, MaskSource};
pub use splat_map::SplatMap;
pub use surface::{PaintSurface, SurfaceConfig, DEFAULT_TEXTURE_SIZE};
