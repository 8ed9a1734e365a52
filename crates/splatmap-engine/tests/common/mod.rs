//! Shared helpers for GPU integration tests.
//!
//! Every test that needs a device is `#[ignore]`d; run them with
//! `cargo test -- --ignored` on a machine with an adapter.

#![allow(dead_code)]

use splatmap_engine::coords::ColorRgba;
use splatmap_engine::device::{Gpu, GpuInit};
use splatmap_engine::logging::{init_logging, LoggingConfig};
use splatmap_engine::paint::{PaintSurface, SurfaceConfig};

/// Opens the default adapter. Panics when none supports compute and
/// `Rgba32Float` render targets, so an ignored test run never passes without a device.
pub fn gpu() -> Gpu {
    init_logging(LoggingConfig {
        env_filter: Some("warn".to_string()),
        ..Default::default()
    });

    match Gpu::new_blocking(GpuInit::default()) {
        Ok(gpu) => gpu,
        Err(e) => panic!("no usable gpu adapter: {e:#}"),
    }
}

/// Surface of `size`×`size` texels, not yet initialized.
pub fn surface(gpu: &Gpu, size: u32) -> PaintSurface {
    let config = SurfaceConfig {
        texture_size: size,
        ..Default::default()
    };
    PaintSurface::new(gpu, config).expect("texture size within device limits")
}

pub fn assert_texels_close(got: &[[f32; 4]], want: &[[f32; 4]], eps: f32) {
    assert_eq!(got.len(), want.len());
    for (i, (g, w)) in got.iter().zip(want).enumerate() {
        for c in 0..4 {
            assert!(
                (g[c] - w[c]).abs() <= eps,
                "texel {i} channel {c}: got {g:?}, want {w:?}"
            );
        }
    }
}

pub const GRAY: ColorRgba = ColorRgba::new(0.5, 0.5, 0.5, 1.0);
