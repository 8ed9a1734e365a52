//! CPU reference for the blend and reduction kernels.
//!
//! These functions are the oracle the GPU passes are validated against. They
//! follow the shaders operation for operation; any change to `blend.wgsl` or
//! `count.wgsl` must be mirrored here.

use crate::brush::{stamp_weight, Stamp};
use crate::coords::{ColorRgba, Vec2};

/// Allocates a `size`×`size` map filled with `color`.
pub fn solid(size: u32, color: ColorRgba) -> Vec<[f32; 4]> {
    vec![color.to_array(); (size as usize) * (size as usize)]
}

/// Applies one stamp to a row-major `size`×`size` map in place.
pub fn blend_stamp(texels: &mut [[f32; 4]], size: u32, stamp: &Stamp) {
    debug_assert_eq!(texels.len(), (size as usize) * (size as usize));

    let extent = size as f32;
    let center = stamp.center * extent;

    for (i, texel) in texels.iter_mut().enumerate() {
        let x = (i % size as usize) as f32 + 0.5;
        let y = (i / size as usize) as f32 + 0.5;
        let d = Vec2::new(x, y).distance(center);
        let w = stamp_weight(d, stamp.size, stamp.hardness, stamp.strength);
        *texel = ColorRgba::from_array(*texel).mix(stamp.color, w).to_array();
    }
}

/// Counts texels whose channels all lie within `tolerance` of `reference`.
pub fn count_matches(texels: &[[f32; 4]], reference: ColorRgba, tolerance: f32) -> u32 {
    texels
        .iter()
        .filter(|t| ColorRgba::from_array(**t).matches(reference, tolerance))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::BrushState;

    const TOL: f32 = 0.5 / 255.0;

    #[test]
    fn solid_map_matches_fill_color_everywhere() {
        let map = solid(16, ColorRgba::RED);
        assert_eq!(count_matches(&map, ColorRgba::RED, TOL), 256);
        assert_eq!(count_matches(&map, ColorRgba::BLUE, TOL), 0);
    }

    #[test]
    fn zero_strength_stamp_is_identity() {
        let mut map = solid(32, ColorRgba::new(0.2, 0.4, 0.6, 1.0));
        let before = map.clone();
        let brush = BrushState::new(ColorRgba::BLUE, 12.0, 0.0);
        blend_stamp(&mut map, 32, &brush.stamp(Vec2::new(0.5, 0.5), None));
        assert_eq!(map, before);
    }

    #[test]
    fn full_strength_stamp_paints_the_core() {
        let mut map = solid(64, ColorRgba::RED);
        let brush = BrushState::new(ColorRgba::BLUE, 10.0, 1.0);
        blend_stamp(&mut map, 64, &brush.stamp(Vec2::new(0.5, 0.5), None));

        // Texel (32, 32) has its center half a texel from the stamp center.
        assert_eq!(map[32 * 64 + 32], ColorRgba::BLUE.to_array());
        // A corner is far outside the radius.
        assert_eq!(map[0], ColorRgba::RED.to_array());
    }

    #[test]
    fn painted_area_tracks_disc_area() {
        let size = 256;
        let mut map = solid(size, ColorRgba::RED);
        let brush = BrushState::new(ColorRgba::BLUE, 30.0, 1.0);
        blend_stamp(&mut map, size, &brush.stamp(Vec2::new(0.5, 0.5), None));

        let blue = count_matches(&map, ColorRgba::BLUE, TOL) as f32;
        let red = count_matches(&map, ColorRgba::RED, TOL) as f32;
        let disc = std::f32::consts::PI * 30.0 * 30.0;

        // Full weight covers at least the hard core, untouched red starts at the rim.
        let core = std::f32::consts::PI * 24.0 * 24.0;
        assert!(blue >= core * 0.97 && blue <= disc, "blue={blue}");
        let total = (size * size) as f32;
        assert!(red <= total - core && red >= total - disc * 1.03, "red={red}");
    }

    #[test]
    fn stamp_near_edge_is_clipped() {
        let size = 32;
        let mut map = solid(size, ColorRgba::WHITE);
        let brush = BrushState::new(ColorRgba::BLACK, 8.0, 1.0);
        blend_stamp(&mut map, size, &brush.stamp(Vec2::new(0.0, 0.0), None));

        let black = count_matches(&map, ColorRgba::BLACK, TOL);
        assert!(black > 0);
        // Only the quadrant inside the map is painted.
        let quarter = (std::f32::consts::PI * 64.0 / 4.0) as u32;
        assert!(black <= quarter);
    }
}
