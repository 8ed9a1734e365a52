/// Which texture is currently exposed as the visible mask.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MaskSource {
    /// The accumulated splat map.
    SplatMap,
    /// The pre-baked fully painted texture.
    FullTexture,
}

/// Consumer of the visible mask, typically a material that samples it.
///
/// The surface calls `bind_mask` whenever the visible texture changes. `view`
/// stays valid until the next call or until the surface is disposed.
pub trait MaskBinding {
    fn bind_mask(&mut self, source: MaskSource, view: &wgpu::TextureView);
}
