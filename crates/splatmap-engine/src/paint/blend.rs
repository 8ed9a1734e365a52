use bytemuck::{Pod, Zeroable};

use super::SplatMap;
use crate::brush::Stamp;

/// Brush uniform layout (48 bytes):
///
///  offset  0  color     [f32; 4]
///  offset 16  center    [f32; 2]
///  offset 24  size      f32
///  offset 28  strength  f32
///  offset 32  extent    [f32; 2]
///  offset 40  hardness  f32
///  offset 44  _pad      f32
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct BrushUniform {
    pub color: [f32; 4],
    pub center: [f32; 2],
    pub size: f32,
    pub strength: f32,
    pub extent: [f32; 2],
    pub hardness: f32,
    pub _pad: f32,
}

impl BrushUniform {
    pub fn from_stamp(stamp: &Stamp, map_size: u32) -> Self {
        Self {
            color: stamp.color.to_array(),
            center: [stamp.center.x, stamp.center.y],
            size: stamp.size,
            strength: stamp.strength,
            extent: [map_size as f32, map_size as f32],
            hardness: stamp.hardness,
            _pad: 0.0,
        }
    }
}

/// Full-screen blend pass that stamps a brush into the splat map.
///
/// The pass never samples the texture it renders to: the caller copies the
/// splat map into a scratch target first and binds that copy here.
pub(crate) struct BlendPipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    brush_ubo: wgpu::Buffer,
}

impl BlendPipeline {
    pub fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("splatmap blend shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/blend.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("splatmap blend bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<BrushUniform>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("splatmap blend pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("splatmap blend pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: SplatMap::FORMAT,
                    // Rgba32Float is not blendable; the shader does the mixing.
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let brush_ubo = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("splatmap brush ubo"),
            size: std::mem::size_of::<BrushUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            pipeline,
            bind_group_layout,
            brush_ubo,
        }
    }

    /// Uploads the brush uniform and records the blend pass.
    ///
    /// The uniform write lands before the next queue submission, so the caller
    /// must submit `encoder` before recording another stamp.
    pub fn encode(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::TextureView,
        target: &wgpu::TextureView,
        brush: &BrushUniform,
    ) {
        queue.write_buffer(&self.brush_ubo, 0, bytemuck::bytes_of(brush));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("splatmap blend bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(source),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: self.brush_ubo.as_entire_binding(),
                },
            ],
        });

        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("splatmap blend pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.draw(0..3, 0..1);
    }

    pub fn destroy(&self) {
        self.brush_ubo.destroy();
    }
}
