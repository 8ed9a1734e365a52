use super::blend::{BlendPipeline, BrushUniform};
use super::scratch::ScratchPool;
use super::{FullTexture, MaskBinding, MaskSource, SplatMap};
use crate::brush::BrushState;
use crate::coords::{ColorRgba, Vec2};
use crate::device::{DeviceHealth, Gpu};
use crate::reduction::{ColorReductionEngine, ReductionConfig};
use crate::PaintError;

/// Edge length of the splat map unless configured otherwise.
pub const DEFAULT_TEXTURE_SIZE: u32 = 1024;

/// Paint surface configuration.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Edge length of the square splat map, in texels. Fixed for the session.
    pub texture_size: u32,

    /// Initial brush state. Its color is also the base fill used by
    /// `initialize_default` and by lazy initialization.
    pub brush: BrushState,

    pub reduction: ReductionConfig,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            texture_size: DEFAULT_TEXTURE_SIZE,
            brush: BrushState::default(),
            reduction: ReductionConfig::default(),
        }
    }
}

/// GPU resources that exist between `initialize` and `dispose`.
struct Resources {
    splat: SplatMap,
    scratch: ScratchPool,
}

impl Resources {
    fn destroy(mut self) {
        self.scratch.destroy();
        self.splat.destroy();
    }
}

enum Lifecycle {
    Uninitialized,
    Ready(Resources),
    Disposed,
}

/// Persistent paint layer: a splat map, the brush session state, the blend
/// pipeline, and the coverage engine bound to the splat map.
///
/// All methods take `&mut self`, so stamps and queries from one owner are
/// submitted in call order on the single device queue.
pub struct PaintSurface {
    device: wgpu::Device,
    queue: wgpu::Queue,
    health: DeviceHealth,

    texture_size: u32,
    brush: BrushState,
    base_color: ColorRgba,

    blend: BlendPipeline,
    reduction: ColorReductionEngine,
    lifecycle: Lifecycle,

    full_texture: Option<FullTexture>,
    mask_source: MaskSource,
    mask_binding: Option<Box<dyn MaskBinding + Send>>,
}

impl PaintSurface {
    /// Builds the pipelines. No splat map exists until `initialize`.
    pub fn new(gpu: &Gpu, config: SurfaceConfig) -> Result<Self, PaintError> {
        let max = gpu.max_texture_size();
        if config.texture_size == 0 || config.texture_size > max {
            return Err(PaintError::InvalidTextureSize {
                size: config.texture_size,
                max,
            });
        }

        let device = gpu.device().clone();
        let queue = gpu.queue().clone();
        let blend = BlendPipeline::new(&device);
        let reduction =
            ColorReductionEngine::with_device(&device, &queue, gpu.health(), config.reduction);

        Ok(Self {
            device,
            queue,
            health: gpu.health().clone(),
            texture_size: config.texture_size,
            base_color: config.brush.color(),
            brush: config.brush,
            blend,
            reduction,
            lifecycle: Lifecycle::Uninitialized,
            full_texture: None,
            mask_source: MaskSource::SplatMap,
            mask_binding: None,
        })
    }

    // ── lifecycle ──────────────────────────────────────────────────────────

    /// Allocates the splat map filled with `color`, makes `color` the session
    /// brush color, and binds the map for coverage queries and display.
    ///
    /// Calling it again starts over with a fresh splat map.
    pub fn initialize(&mut self, color: ColorRgba) -> Result<(), PaintError> {
        self.allocate(color)?;
        self.brush.set_color(color);
        Ok(())
    }

    /// `initialize` with the configured base color (white unless configured).
    pub fn initialize_default(&mut self) -> Result<(), PaintError> {
        self.initialize(self.base_color)
    }

    /// Replaces the splat map with one cleared to `fill`. Leaves the brush alone.
    fn allocate(&mut self, fill: ColorRgba) -> Result<(), PaintError> {
        if matches!(self.lifecycle, Lifecycle::Disposed) {
            return Err(PaintError::Disposed);
        }
        self.health.check()?;

        let splat = SplatMap::new(&self.device, &self.queue, self.texture_size, fill);
        self.reduction.bind(splat.texture())?;

        let resources = Resources {
            splat,
            scratch: ScratchPool::new(self.texture_size),
        };
        if let Lifecycle::Ready(old) =
            std::mem::replace(&mut self.lifecycle, Lifecycle::Ready(resources))
        {
            log::debug!("paint surface re-initialized; previous splat map released");
            old.destroy();
        }

        self.mask_source = MaskSource::SplatMap;
        self.notify_mask();

        log::info!(
            "paint surface initialized: {0}x{0}, fill {fill:?}",
            self.texture_size
        );
        Ok(())
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready(_))
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Disposed)
    }

    /// Releases the splat map, scratch targets, full texture and counter.
    ///
    /// Idempotent. Every later GPU operation fails with `PaintError::Disposed`.
    pub fn dispose(&mut self) {
        match std::mem::replace(&mut self.lifecycle, Lifecycle::Disposed) {
            Lifecycle::Disposed => return,
            Lifecycle::Ready(resources) => resources.destroy(),
            Lifecycle::Uninitialized => {}
        }

        if let Some(full) = self.full_texture.take() {
            full.destroy();
        }
        self.mask_binding = None;
        self.reduction.dispose();
        self.blend.destroy();
        log::debug!("paint surface disposed");
    }

    // ── painting ───────────────────────────────────────────────────────────

    /// Stamps the brush at `uv` with the session color.
    pub fn paint(&mut self, uv: Vec2) -> Result<(), PaintError> {
        self.stamp(uv, None)
    }

    /// Stamps the brush at `uv` with `color`, leaving the session color as is.
    pub fn paint_with_color(&mut self, uv: Vec2, color: ColorRgba) -> Result<(), PaintError> {
        self.stamp(uv, Some(color))
    }

    fn stamp(&mut self, uv: Vec2, color: Option<ColorRgba>) -> Result<(), PaintError> {
        if self.is_disposed() {
            return Err(PaintError::Disposed);
        }
        self.health.check()?;
        if !uv.is_finite() {
            return Err(PaintError::InvalidCoordinate { u: uv.x, v: uv.y });
        }

        if !self.is_initialized() {
            log::warn!(
                "paint surface used before initialize; filling with base color {:?}. \
                 Call initialize during setup.",
                self.base_color
            );
            self.allocate(self.base_color)?;
        }

        let stamp = self.brush.stamp(uv.clamp_unit(), color);
        let Lifecycle::Ready(res) = &mut self.lifecycle else {
            return Err(PaintError::Disposed);
        };
        let uniform = BrushUniform::from_stamp(&stamp, res.splat.size());

        let scratch = res.scratch.acquire(&self.device);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("splatmap stamp encoder"),
            });

        res.splat.copy_to(&mut encoder, &scratch.texture);
        self.blend.encode(
            &self.device,
            &self.queue,
            &mut encoder,
            &scratch.view,
            res.splat.view(),
            &uniform,
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        res.scratch.release(scratch);
        Ok(())
    }

    // ── brush state ────────────────────────────────────────────────────────

    #[inline]
    pub fn brush(&self) -> &BrushState {
        &self.brush
    }

    pub fn set_brush_color(&mut self, color: ColorRgba) {
        self.brush.set_color(color);
    }

    /// Clamped to `[1, 500]`.
    pub fn set_brush_size(&mut self, size: f32) {
        self.brush.set_size(size);
    }

    /// Clamped to `[0, 1]`.
    pub fn set_brush_strength(&mut self, strength: f32) {
        self.brush.set_strength(strength);
    }

    /// Clamped to `[0, 1]`.
    pub fn set_brush_hardness(&mut self, hardness: f32) {
        self.brush.set_hardness(hardness);
    }

    // ── coverage ───────────────────────────────────────────────────────────

    /// Percentage of the splat map matching `color`, scaled by `fill_ratio`.
    ///
    /// Blocks until all previously submitted stamps have executed.
    pub fn percent_of(&mut self, color: ColorRgba, fill_ratio: f32) -> Result<f32, PaintError> {
        if self.is_disposed() {
            return Err(PaintError::Disposed);
        }
        self.reduction.query_percent(color, fill_ratio)
    }

    /// Raw number of splat map texels matching `color`.
    pub fn count_of(&mut self, color: ColorRgba) -> Result<u32, PaintError> {
        if self.is_disposed() {
            return Err(PaintError::Disposed);
        }
        self.reduction.count_matches(color)
    }

    /// Tolerance of the coverage color-match predicate.
    #[inline]
    pub fn match_tolerance(&self) -> f32 {
        self.reduction.tolerance()
    }

    // ── visible mask ───────────────────────────────────────────────────────

    /// Attaches the mask consumer and binds the current visible mask to it.
    pub fn set_mask_binding(&mut self, binding: Box<dyn MaskBinding + Send>) {
        self.mask_binding = Some(binding);
        self.notify_mask();
    }

    /// Supplies the pre-baked texture shown by `set_full_texture`.
    pub fn set_full_texture_source(&mut self, full: FullTexture) -> Result<(), PaintError> {
        if self.is_disposed() {
            return Err(PaintError::Disposed);
        }
        if full.size() != self.texture_size {
            return Err(PaintError::FullTextureSize {
                got: full.size(),
                expected: self.texture_size,
            });
        }

        if let Some(old) = self.full_texture.replace(full) {
            old.destroy();
        }
        if self.mask_source == MaskSource::FullTexture {
            self.notify_mask();
        }
        Ok(())
    }

    /// Shows the fully painted texture instead of the splat map.
    ///
    /// The splat map and coverage queries are unaffected. Without a supplied
    /// source, a solid texture of the current brush color is baked.
    pub fn set_full_texture(&mut self) -> Result<(), PaintError> {
        if self.is_disposed() {
            return Err(PaintError::Disposed);
        }
        self.health.check()?;

        if self.full_texture.is_none() {
            let color = self.brush.color();
            log::info!("no full texture supplied; baking solid {color:?}");
            self.full_texture = Some(FullTexture::solid_on(
                &self.device,
                &self.queue,
                self.texture_size,
                color,
            ));
        }

        self.mask_source = MaskSource::FullTexture;
        self.notify_mask();
        Ok(())
    }

    /// Shows the accumulated splat map again.
    pub fn show_splat_map(&mut self) -> Result<(), PaintError> {
        if self.is_disposed() {
            return Err(PaintError::Disposed);
        }
        self.mask_source = MaskSource::SplatMap;
        self.notify_mask();
        Ok(())
    }

    #[inline]
    pub fn mask_source(&self) -> MaskSource {
        self.mask_source
    }

    /// The texture view mask consumers should sample, if one exists yet.
    pub fn visible_mask(&self) -> Option<&wgpu::TextureView> {
        match self.mask_source {
            MaskSource::SplatMap => match &self.lifecycle {
                Lifecycle::Ready(res) => Some(res.splat.view()),
                _ => None,
            },
            MaskSource::FullTexture => self.full_texture.as_ref().map(FullTexture::view),
        }
    }

    fn notify_mask(&mut self) {
        let Some(binding) = self.mask_binding.as_mut() else { return };
        let view = match self.mask_source {
            MaskSource::SplatMap => match &self.lifecycle {
                Lifecycle::Ready(res) => res.splat.view(),
                _ => return,
            },
            MaskSource::FullTexture => match &self.full_texture {
                Some(full) => full.view(),
                None => return,
            },
        };
        binding.bind_mask(self.mask_source, view);
    }

    // ── inspection ─────────────────────────────────────────────────────────

    #[inline]
    pub fn texture_size(&self) -> u32 {
        self.texture_size
    }

    /// Fill used by `initialize_default` and lazy initialization.
    #[inline]
    pub fn base_color(&self) -> ColorRgba {
        self.base_color
    }

    pub fn splat_map(&self) -> Option<&SplatMap> {
        match &self.lifecycle {
            Lifecycle::Ready(res) => Some(&res.splat),
            _ => None,
        }
    }

    /// Scratch targets currently allocated by the stamp pool.
    pub fn scratch_targets(&self) -> usize {
        match &self.lifecycle {
            Lifecycle::Ready(res) => res.scratch.allocated(),
            _ => 0,
        }
    }

    /// Synchronous copy of the splat map texels, row-major.
    pub fn read_splat_map(&self) -> Result<Vec<[f32; 4]>, PaintError> {
        if self.is_disposed() {
            return Err(PaintError::Disposed);
        }
        self.health.check()?;
        match &self.lifecycle {
            Lifecycle::Ready(res) => res.splat.read_pixels(&self.device, &self.queue),
            Lifecycle::Uninitialized => Err(PaintError::NotBound),
            Lifecycle::Disposed => Err(PaintError::Disposed),
        }
    }
}

impl Drop for PaintSurface {
    fn drop(&mut self) {
        self.dispose();
    }
}
