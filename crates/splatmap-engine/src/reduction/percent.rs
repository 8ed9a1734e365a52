/// Workgroup edge length; must match `@workgroup_size` in `count.wgsl`.
pub const WORKGROUP_SIZE: u32 = 8;

/// Default per-channel match tolerance: half an 8-bit quantization step.
///
/// A texel matches a reference color when `|texel.c - reference.c| <= tolerance`
/// for all four channels. Soft brush edges therefore count only where they are
/// within this distance of the reference.
pub const DEFAULT_MATCH_TOLERANCE: f32 = 0.5 / 255.0;

/// Number of workgroups covering a `width`×`height` texture.
///
/// Ceiling division; the shader masks invocations past the edge.
#[inline]
pub fn dispatch_size(width: u32, height: u32) -> (u32, u32) {
    (width.div_ceil(WORKGROUP_SIZE), height.div_ceil(WORKGROUP_SIZE))
}

/// `count × fill_ratio / (width × height) × 100`.
///
/// `fill_ratio` corrects for surfaces whose visible part is smaller than the
/// texture; at `1.0` the ratio is taken at face value. Zero-area textures
/// report `0`.
#[inline]
pub fn coverage_percent(count: u32, fill_ratio: f32, width: u32, height: u32) -> f32 {
    let area = width as f64 * height as f64;
    if area == 0.0 {
        return 0.0;
    }
    (count as f64 * fill_ratio as f64 / area * 100.0) as f32
}
