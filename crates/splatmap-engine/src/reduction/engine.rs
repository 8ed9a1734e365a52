use bytemuck::{Pod, Zeroable};

use super::percent::{coverage_percent, dispatch_size, DEFAULT_MATCH_TOLERANCE};
use crate::coords::ColorRgba;
use crate::device::{wait_for_map, DeviceHealth, Gpu};
use crate::PaintError;

/// Reduction configuration.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ReductionConfig {
    /// Per-channel absolute tolerance of the color-match predicate.
    ///
    /// Part of the query contract: changing it changes every reported
    /// percentage for soft-edged strokes.
    pub match_tolerance: f32,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            match_tolerance: DEFAULT_MATCH_TOLERANCE,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MatchParams {
    reference: [f32; 4],
    tolerance: f32,
    _pad: [f32; 3], // 16-byte struct alignment
}

/// The single-element counter and its CPU-visible staging copy.
struct Counter {
    storage: wgpu::Buffer,
    readback: wgpu::Buffer,
}

struct BoundTexture {
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

/// Counts texels of a bound texture that match a reference color.
///
/// Every query is a blocking synchronization point: it waits for all work
/// previously submitted to the queue (including paint passes) and for the
/// counter readback.
pub struct ColorReductionEngine {
    device: wgpu::Device,
    queue: wgpu::Queue,
    health: DeviceHealth,

    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    params_ubo: wgpu::Buffer,

    /// `None` once disposed.
    counter: Option<Counter>,
    bound: Option<BoundTexture>,

    tolerance: f32,
}

impl ColorReductionEngine {
    pub fn new(gpu: &Gpu, config: ReductionConfig) -> Self {
        Self::with_device(gpu.device(), gpu.queue(), gpu.health(), config)
    }

    pub(crate) fn with_device(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        health: &DeviceHealth,
        config: ReductionConfig,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("splatmap count shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/count.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("splatmap count bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<u32>() as u64),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<MatchParams>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("splatmap count pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("splatmap count pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("cs_main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let params_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("splatmap count params ubo"),
            size: std::mem::size_of::<MatchParams>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let counter = Counter {
            storage: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("splatmap match counter"),
                size: std::mem::size_of::<u32>() as u64,
                usage: wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_SRC
                    | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
            readback: device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("splatmap match counter readback"),
                size: std::mem::size_of::<u32>() as u64,
                usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        };

        let tolerance = if config.match_tolerance.is_finite() && config.match_tolerance >= 0.0 {
            config.match_tolerance
        } else {
            log::warn!(
                "invalid match tolerance {}; using {}",
                config.match_tolerance,
                DEFAULT_MATCH_TOLERANCE
            );
            DEFAULT_MATCH_TOLERANCE
        };

        Self {
            device: device.clone(),
            queue: queue.clone(),
            health: health.clone(),
            pipeline,
            bind_group_layout,
            params_ubo,
            counter: Some(counter),
            bound: None,
            tolerance,
        }
    }

    /// Associates the engine with the texture it scans. Rebinding replaces the
    /// previous texture.
    pub fn bind(&mut self, texture: &wgpu::Texture) -> Result<(), PaintError> {
        let counter = self.counter.as_ref().ok_or(PaintError::Disposed)?;

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("splatmap count bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: counter.storage.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: self.params_ubo.as_entire_binding(),
                },
            ],
        });

        self.bound = Some(BoundTexture {
            bind_group,
            width: texture.width(),
            height: texture.height(),
        });
        log::debug!("reduction bound to {}x{} texture", texture.width(), texture.height());
        Ok(())
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.counter.is_none()
    }

    /// The per-channel tolerance used by the match predicate.
    #[inline]
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Percentage of the bound texture matching `reference`, scaled by `fill_ratio`.
    pub fn query_percent(
        &mut self,
        reference: ColorRgba,
        fill_ratio: f32,
    ) -> Result<f32, PaintError> {
        let count = self.count_matches(reference)?;
        let (width, height) = self
            .bound
            .as_ref()
            .map(|b| (b.width, b.height))
            .ok_or(PaintError::NotBound)?;
        Ok(coverage_percent(count, fill_ratio, width, height))
    }

    /// Number of texels matching `reference`.
    ///
    /// Resets the counter, dispatches the count pass, and blocks on readback.
    pub fn count_matches(&mut self, reference: ColorRgba) -> Result<u32, PaintError> {
        self.health.check()?;
        let counter = self.counter.as_ref().ok_or(PaintError::Disposed)?;
        let bound = self.bound.as_ref().ok_or(PaintError::NotBound)?;

        let params = MatchParams {
            reference: reference.to_array(),
            tolerance: self.tolerance,
            _pad: [0.0; 3],
        };
        self.queue
            .write_buffer(&self.params_ubo, 0, bytemuck::bytes_of(&params));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("splatmap count encoder"),
            });

        encoder.clear_buffer(&counter.storage, 0, None);
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("splatmap count pass"),
                timestamp_writes: None,
            });
            let (dx, dy) = dispatch_size(bound.width, bound.height);
            cpass.set_pipeline(&self.pipeline);
            cpass.set_bind_group(0, &bound.bind_group, &[]);
            cpass.dispatch_workgroups(dx, dy, 1);
        }
        encoder.copy_buffer_to_buffer(
            &counter.storage,
            0,
            &counter.readback,
            0,
            std::mem::size_of::<u32>() as u64,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let slice = counter.readback.slice(..);
        wait_for_map(&self.device, slice)?;
        let count = {
            let mapped = slice.get_mapped_range();
            bytemuck::pod_read_unaligned::<u32>(&mapped[..std::mem::size_of::<u32>()])
        };
        counter.readback.unmap();

        self.health.check()?;
        log::trace!("matched {count} texels of {reference:?}");
        Ok(count)
    }

    /// Releases the counter buffers. Idempotent.
    pub fn dispose(&mut self) {
        self.bound = None;
        if let Some(counter) = self.counter.take() {
            counter.storage.destroy();
            counter.readback.destroy();
            self.params_ubo.destroy();
            log::debug!("reduction counter released");
        }
    }
}

impl Drop for ColorReductionEngine {
    fn drop(&mut self) {
        self.dispose();
    }
}
