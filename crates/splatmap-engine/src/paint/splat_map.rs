use crate::coords::ColorRgba;
use crate::device::{align_to, wait_for_map, COPY_BYTES_PER_ROW_ALIGNMENT};
use crate::PaintError;

/// Bytes per `Rgba32Float` texel.
const TEXEL_BYTES: u32 = 16;

/// Persistent square paint target.
///
/// The size is fixed at creation. The texture is readable by the blend pass
/// (through a scratch copy), by the reduction pass, and by mask consumers.
pub struct SplatMap {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: u32,
}

impl SplatMap {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;

    /// Usages every splat-map-shaped texture (splat, scratch, full) carries.
    pub const USAGE: wgpu::TextureUsages = wgpu::TextureUsages::RENDER_ATTACHMENT
        .union(wgpu::TextureUsages::TEXTURE_BINDING)
        .union(wgpu::TextureUsages::COPY_SRC)
        .union(wgpu::TextureUsages::COPY_DST);

    /// Allocates a splat map and clears it to `fill`.
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        size: u32,
        fill: ColorRgba,
    ) -> Self {
        let texture = create_target(device, size, "splatmap splat map");
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        clear_target(device, queue, &view, fill, "splatmap splat clear");
        log::debug!("splat map allocated: {size}x{size}, fill {fill:?}");
        Self { texture, view, size }
    }

    #[inline]
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    #[inline]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Records a full copy of this map into `dst`, which must share its size.
    pub(crate) fn copy_to(&self, encoder: &mut wgpu::CommandEncoder, dst: &wgpu::Texture) {
        encoder.copy_texture_to_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyTextureInfo {
                texture: dst,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            extent(self.size),
        );
    }

    /// Reads the map back to CPU memory in row-major order.
    ///
    /// Expensive and synchronous: waits for all queued work, then copies
    /// `size² × 16` bytes. Intended for tests and debug tooling.
    pub(crate) fn read_pixels(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<Vec<[f32; 4]>, PaintError> {
        let row_bytes = self.size * TEXEL_BYTES;
        let padded_row_bytes = align_to(row_bytes, COPY_BYTES_PER_ROW_ALIGNMENT);

        let readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("splatmap splat readback"),
            size: padded_row_bytes as u64 * self.size as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("splatmap splat readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row_bytes),
                    rows_per_image: Some(self.size),
                },
            },
            extent(self.size),
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = readback.slice(..);
        wait_for_map(device, slice)?;

        let mapped = slice.get_mapped_range();
        let mut out = Vec::with_capacity((self.size as usize) * (self.size as usize));
        for row in 0..self.size as usize {
            let start = row * padded_row_bytes as usize;
            let bytes = &mapped[start..start + row_bytes as usize];
            out.extend(
                bytes
                    .chunks_exact(TEXEL_BYTES as usize)
                    .map(|t| bytemuck::pod_read_unaligned::<[f32; 4]>(t)),
            );
        }
        drop(mapped);
        readback.unmap();
        readback.destroy();

        Ok(out)
    }

    pub(crate) fn destroy(&self) {
        self.texture.destroy();
    }
}

/// Creates a texture with the splat map format, size and usages.
pub(crate) fn create_target(device: &wgpu::Device, size: u32, label: &str) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: SplatMap::FORMAT,
        usage: SplatMap::USAGE,
        view_formats: &[],
    })
}

/// Submits a pass that only clears `view` to `color`.
pub(crate) fn clear_target(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    view: &wgpu::TextureView,
    color: ColorRgba,
    label: &str,
) {
    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some(label),
    });
    {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
    }
    queue.submit(std::iter::once(encoder.finish()));
}

#[inline]
pub(crate) fn extent(size: u32) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size,
        height: size,
        depth_or_array_layers: 1,
    }
}
