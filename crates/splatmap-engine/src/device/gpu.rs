use anyhow::{Context, Result};

use super::{DeviceHealth, GpuInit};
use crate::paint::SplatMap;

/// Owns the headless wgpu core objects.
///
/// This type is the low-level compute/render context:
/// - creates and stores Instance/Adapter/Device/Queue
/// - validates that the adapter supports the splat map format and compute
/// - installs device-loss tracking
///
/// `wgpu::Device` and `wgpu::Queue` are cheap handles; paint surfaces and
/// reduction engines keep their own clones, so a `Gpu` may be dropped once
/// they are built.
pub struct Gpu {
    /// Selected adapter.
    adapter: wgpu::Adapter,

    /// Logical device.
    device: wgpu::Device,

    /// Command queue. All paint and query work is submitted here in order.
    queue: wgpu::Queue,

    /// Device-loss flag shared with every component built from this context.
    health: DeviceHealth,

    /// Declared last so the instance outlives device-level objects on drop.
    _instance: wgpu::Instance,
}

impl Gpu {
    /// Creates a GPU context without a surface.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(init: GpuInit) -> Result<Self> {
        let GpuInit {
            backends,
            power_preference,
            force_fallback_adapter,
            required_features,
            required_limits,
        } = init;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference,
                compatible_surface: None,
                force_fallback_adapter,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        check_adapter_support(&adapter)?;

        let required_limits = required_limits.unwrap_or_else(|| {
            wgpu::Limits::downlevel_defaults().using_resolution(adapter.limits())
        });

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("splatmap-engine device"),
                required_features,
                required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let health = DeviceHealth::default();
        health.watch(&device);

        log::info!("gpu ready: {}", adapter_summary(&adapter));

        Ok(Self {
            adapter,
            device,
            queue,
            health,
            _instance: instance,
        })
    }

    /// Blocking variant of [`Gpu::new`] for callers without an executor.
    pub fn new_blocking(init: GpuInit) -> Result<Self> {
        pollster::block_on(Self::new(init))
    }

    /// Returns a reference to the logical device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns a reference to the command queue.
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the device-loss flag.
    pub fn health(&self) -> &DeviceHealth {
        &self.health
    }

    /// Largest square splat map the device accepts.
    pub fn max_texture_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    /// Human-readable adapter description for logs.
    pub fn adapter_summary(&self) -> String {
        adapter_summary(&self.adapter)
    }
}

fn adapter_summary(adapter: &wgpu::Adapter) -> String {
    let info = adapter.get_info();
    format!("{} ({:?}, {:?})", info.name, info.backend, info.device_type)
}

fn check_adapter_support(adapter: &wgpu::Adapter) -> Result<()> {
    let downlevel = adapter.get_downlevel_capabilities();
    anyhow::ensure!(
        downlevel.flags.contains(wgpu::DownlevelFlags::COMPUTE_SHADERS),
        "adapter {} does not support compute shaders",
        adapter_summary(adapter)
    );

    let needed = SplatMap::USAGE;
    let allowed = adapter
        .get_texture_format_features(SplatMap::FORMAT)
        .allowed_usages;
    anyhow::ensure!(
        allowed.contains(needed),
        "adapter {} cannot use {:?} with {:?} (allowed: {:?})",
        adapter_summary(adapter),
        SplatMap::FORMAT,
        needed,
        allowed
    );

    Ok(())
}
