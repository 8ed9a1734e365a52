use anyhow::{Context, Result};
use splatmap_engine::coords::{ColorRgba, Vec2};
use splatmap_engine::device::{Gpu, GpuInit};
use splatmap_engine::logging::{init_logging, LoggingConfig};
use splatmap_engine::paint::{MaskBinding, MaskSource, PaintSurface, SurfaceConfig};
use splatmap_engine::wgpu;

/// Base color the surface starts with.
const BASE: ColorRgba = ColorRgba::RED;

/// Color the simulated gesture paints with.
const INK: ColorRgba = ColorRgba::BLUE;

/// Stamps per simulated gesture row.
const STAMPS_PER_ROW: usize = 24;

/// Stand-in for the material that samples the mask. It only reports bindings.
#[derive(Default)]
struct ConsoleMaterial {
    bindings: usize,
}

impl MaskBinding for ConsoleMaterial {
    fn bind_mask(&mut self, source: MaskSource, _view: &wgpu::TextureView) {
        self.bindings += 1;
        log::info!("material mask -> {source:?} (binding #{})", self.bindings);
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let gpu = Gpu::new_blocking(GpuInit::default()).context("failed to initialize the gpu")?;
    let mut surface =
        PaintSurface::new(&gpu, SurfaceConfig::default()).context("failed to build paint surface")?;

    surface.set_mask_binding(Box::new(ConsoleMaterial::default()));
    surface.initialize(BASE)?;
    surface.set_brush_size(48.0);
    surface.set_brush_strength(1.0);

    // A zig-zag drag across the middle band, standing in for raycast hits.
    for (i, uv) in gesture().enumerate() {
        surface.paint_with_color(uv, INK)?;

        // One query per input cycle; it blocks on the queue.
        if i % STAMPS_PER_ROW == STAMPS_PER_ROW - 1 {
            let painted = surface.percent_of(INK, 1.0)?;
            let remaining = surface.percent_of(BASE, 1.0)?;
            println!(
                "Color Percentage: {}%  (base left: {}%)",
                painted.round() as i32,
                remaining.round() as i32
            );
        }
    }

    surface.set_full_texture()?;
    println!("Revealed full texture; splat coverage still {:.2}%", surface.percent_of(INK, 1.0)?);

    surface.dispose();
    Ok(())
}

fn gesture() -> impl Iterator<Item = Vec2> {
    (0..6).flat_map(|row| {
        let v = 0.25 + row as f32 * 0.1;
        (0..STAMPS_PER_ROW).map(move |i| {
            let t = i as f32 / (STAMPS_PER_ROW - 1) as f32;
            let u = if row % 2 == 0 { t } else { 1.0 - t };
            Vec2::new(0.05 + u * 0.9, v)
        })
    })
}
