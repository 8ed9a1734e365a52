mod common;

use std::f64::consts::PI;

use splatmap_engine::coords::{ColorRgba, Vec2};
use splatmap_engine::reduction::{ColorReductionEngine, ReductionConfig};
use splatmap_engine::paint::FullTexture;
use splatmap_engine::{reference, PaintError};

use common::{gpu, surface, GRAY};

// ── whole-map queries ─────────────────────────────────────────────────────

#[test]
#[ignore = "requires a GPU adapter"]
fn fresh_map_is_entirely_its_fill_color() {
    let gpu = gpu();
    let mut s = surface(&gpu, 128);
    s.initialize(GRAY).unwrap();

    assert_eq!(s.percent_of(GRAY, 1.0).unwrap(), 100.0);
    assert_eq!(s.percent_of(ColorRgba::WHITE, 1.0).unwrap(), 0.0);
    assert_eq!(s.count_of(GRAY).unwrap(), 128 * 128);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn match_tolerance_is_half_a_byte_step() {
    let gpu = gpu();
    let mut s = surface(&gpu, 64);
    s.initialize(GRAY).unwrap();

    let one_step_off = ColorRgba::new(0.5 + 1.0 / 255.0, 0.5, 0.5, 1.0);
    let quarter_step_off = ColorRgba::new(0.5, 0.5 - 0.25 / 255.0, 0.5, 1.0);
    assert_eq!(s.percent_of(one_step_off, 1.0).unwrap(), 0.0);
    assert_eq!(s.percent_of(quarter_step_off, 1.0).unwrap(), 100.0);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn queries_are_repeatable() {
    let gpu = gpu();
    let mut s = surface(&gpu, 128);
    s.initialize(ColorRgba::RED).unwrap();
    s.set_brush_size(20.0);
    s.paint_with_color(Vec2::new(0.4, 0.6), ColorRgba::BLUE).unwrap();

    let first = s.percent_of(ColorRgba::BLUE, 1.0).unwrap();
    for _ in 0..4 {
        assert_eq!(s.percent_of(ColorRgba::BLUE, 1.0).unwrap(), first);
    }
    assert!(first > 0.0);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn fill_ratio_scales_linearly() {
    let gpu = gpu();
    let mut s = surface(&gpu, 64);
    s.initialize(ColorRgba::GREEN).unwrap();

    assert_eq!(s.percent_of(ColorRgba::GREEN, 0.5).unwrap(), 50.0);
    assert_eq!(s.percent_of(ColorRgba::GREEN, 2.0).unwrap(), 200.0);
    assert_eq!(s.percent_of(ColorRgba::GREEN, 0.0).unwrap(), 0.0);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn odd_sized_map_is_fully_counted() {
    let gpu = gpu();
    // Not a multiple of the workgroup edge; partial workgroups must still count.
    let mut s = surface(&gpu, 37);
    s.initialize(ColorRgba::BLUE).unwrap();
    assert_eq!(s.count_of(ColorRgba::BLUE).unwrap(), 37 * 37);
}

// ── stroke coverage ───────────────────────────────────────────────────────

#[test]
#[ignore = "requires a GPU adapter"]
fn single_stamp_covers_about_its_disc() {
    let gpu = gpu();
    let mut s = surface(&gpu, 1024);
    s.initialize(ColorRgba::RED).unwrap();
    s.set_brush_size(50.0);
    s.set_brush_strength(1.0);
    s.paint_with_color(Vec2::new(0.5, 0.5), ColorRgba::BLUE).unwrap();

    let blue = s.percent_of(ColorRgba::BLUE, 1.0).unwrap() as f64;
    let red = s.percent_of(ColorRgba::RED, 1.0).unwrap() as f64;

    let area = 1024.0 * 1024.0;
    let disc = PI * 50.0 * 50.0 / area * 100.0;
    let core = PI * 40.0 * 40.0 / area * 100.0;

    assert!(blue > 0.0 && red < 100.0);
    assert!(blue >= core * 0.97 && blue <= disc, "blue={blue}");
    assert!(red >= 100.0 - disc * 1.03 && red <= 100.0 - core, "red={red}");
}

#[test]
#[ignore = "requires a GPU adapter"]
fn gpu_count_agrees_with_cpu_reference() {
    let gpu = gpu();
    let size = 128;
    let mut s = surface(&gpu, size);
    s.initialize(ColorRgba::RED).unwrap();
    s.set_brush_size(18.0);

    let mut expected = reference::solid(size, ColorRgba::RED);
    for uv in [Vec2::new(0.2, 0.2), Vec2::new(0.5, 0.5), Vec2::new(0.55, 0.5)] {
        s.paint_with_color(uv, ColorRgba::BLUE).unwrap();
        reference::blend_stamp(&mut expected, size, &s.brush().stamp(uv, Some(ColorRgba::BLUE)));
    }

    let tol = s.match_tolerance();
    for color in [ColorRgba::RED, ColorRgba::BLUE] {
        let gpu_count = s.count_of(color).unwrap() as i64;
        let cpu_count = reference::count_matches(&expected, color, tol) as i64;
        // Texels sitting exactly on the tolerance edge may round either way.
        assert!(
            (gpu_count - cpu_count).abs() <= 8,
            "{color:?}: gpu={gpu_count} cpu={cpu_count}"
        );
    }
}

// ── standalone engine ─────────────────────────────────────────────────────

#[test]
#[ignore = "requires a GPU adapter"]
fn engine_counts_any_bound_texture() {
    let gpu = gpu();
    let full = FullTexture::solid(&gpu, 32, ColorRgba::BLACK);
    let mut engine = ColorReductionEngine::new(&gpu, ReductionConfig::default());

    assert!(matches!(
        engine.count_matches(ColorRgba::BLACK),
        Err(PaintError::NotBound)
    ));

    engine.bind(full.texture()).unwrap();
    assert_eq!(engine.count_matches(ColorRgba::BLACK).unwrap(), 32 * 32);
    assert_eq!(engine.query_percent(ColorRgba::BLACK, 1.0).unwrap(), 100.0);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn engine_rebinding_replaces_the_texture() {
    let gpu = gpu();
    let mut pixels = vec![[0.0, 0.0, 0.0, 1.0]; 16];
    pixels[0] = [1.0; 4];
    pixels[5] = [1.0; 4];
    let mostly_black = FullTexture::from_pixels(&gpu, 4, &pixels).unwrap();
    let white = FullTexture::solid(&gpu, 8, ColorRgba::WHITE);

    let mut engine = ColorReductionEngine::new(&gpu, ReductionConfig::default());
    engine.bind(mostly_black.texture()).unwrap();
    assert_eq!(engine.count_matches(ColorRgba::WHITE).unwrap(), 2);
    assert_eq!(engine.query_percent(ColorRgba::WHITE, 1.0).unwrap(), 12.5);

    engine.bind(white.texture()).unwrap();
    assert_eq!(engine.count_matches(ColorRgba::WHITE).unwrap(), 64);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn engine_tolerance_widens_matches() {
    let gpu = gpu();
    let near_gray = FullTexture::solid(&gpu, 8, ColorRgba::new(0.51, 0.5, 0.5, 1.0));

    let mut strict = ColorReductionEngine::new(&gpu, ReductionConfig::default());
    strict.bind(near_gray.texture()).unwrap();
    assert_eq!(strict.count_matches(GRAY).unwrap(), 0);

    let mut loose = ColorReductionEngine::new(&gpu, ReductionConfig { match_tolerance: 0.02 });
    loose.bind(near_gray.texture()).unwrap();
    assert_eq!(loose.count_matches(GRAY).unwrap(), 64);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn disposed_engine_rejects_work() {
    let gpu = gpu();
    let full = FullTexture::solid(&gpu, 8, ColorRgba::WHITE);
    let mut engine = ColorReductionEngine::new(&gpu, ReductionConfig::default());
    engine.bind(full.texture()).unwrap();

    engine.dispose();
    engine.dispose();
    assert!(engine.is_disposed());
    assert!(matches!(engine.bind(full.texture()), Err(PaintError::Disposed)));
    assert!(matches!(
        engine.count_matches(ColorRgba::WHITE),
        Err(PaintError::Disposed)
    ));
}
