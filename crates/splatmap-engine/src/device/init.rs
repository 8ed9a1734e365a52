/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Backends wgpu may select from.
    pub backends: wgpu::Backends,

    /// Adapter power preference.
    pub power_preference: wgpu::PowerPreference,

    /// Request a software adapter (WARP, lavapipe, llvmpipe).
    ///
    /// Useful for CI machines without a hardware GPU.
    pub force_fallback_adapter: bool,

    /// Required wgpu features.
    ///
    /// The paint and reduction passes only use core WebGPU functionality.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    ///
    /// `None` requests downlevel defaults raised to the adapter's texture
    /// resolution limits, which keeps large splat maps available on
    /// conservative backends.
    pub required_limits: Option<wgpu::Limits>,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::HighPerformance,
            force_fallback_adapter: false,
            required_features: wgpu::Features::empty(),
            required_limits: None,
        }
    }
}
