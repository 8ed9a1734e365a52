use super::splat_map::{clear_target, create_target, extent};
use crate::coords::ColorRgba;
use crate::device::Gpu;
use crate::PaintError;

/// Pre-baked "fully painted" mask shown by `PaintSurface::set_full_texture`.
///
/// Shares the splat map's format so mask consumers bind it the same way.
pub struct FullTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: u32,
}

impl FullTexture {
    /// Bakes a texture filled with a single color.
    pub fn solid(gpu: &Gpu, size: u32, color: ColorRgba) -> Self {
        Self::solid_on(gpu.device(), gpu.queue(), size, color)
    }

    pub(crate) fn solid_on(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        color: ColorRgba,
    ) -> Self {
        let texture = create_target(device, size, "splatmap full texture");
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        clear_target(device, queue, &view, color, "splatmap full texture clear");
        Self { texture, view, size }
    }

    /// Uploads row-major texels.
    pub fn from_pixels(gpu: &Gpu, size: u32, pixels: &[[f32; 4]]) -> Result<Self, PaintError> {
        let expected = (size as usize) * (size as usize);
        if pixels.len() != expected {
            return Err(PaintError::PixelCount {
                got: pixels.len(),
                expected,
            });
        }

        let texture = create_target(gpu.device(), size, "splatmap full texture");
        gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(pixels),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size * 16),
                rows_per_image: Some(size),
            },
            extent(size),
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self { texture, view, size })
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    pub(crate) fn destroy(&self) {
        self.texture.destroy();
    }
}
