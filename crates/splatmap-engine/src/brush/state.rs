use crate::coords::{ColorRgba, Vec2};

pub const MIN_BRUSH_SIZE: f32 = 1.0;
pub const MAX_BRUSH_SIZE: f32 = 500.0;
pub const MIN_BRUSH_STRENGTH: f32 = 0.0;
pub const MAX_BRUSH_STRENGTH: f32 = 1.0;

/// Fraction of the radius painted at full weight before the falloff ramp.
pub const DEFAULT_HARDNESS: f32 = 0.8;

/// Persistent brush configuration for a painting session.
///
/// Invariants:
/// - `size` in `[MIN_BRUSH_SIZE, MAX_BRUSH_SIZE]` (radius in texels)
/// - `strength` and `hardness` in `[0, 1]`
///
/// Setters clamp out-of-range input instead of rejecting it. Non-finite input
/// keeps the previous value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BrushState {
    color: ColorRgba,
    size: f32,
    strength: f32,
    hardness: f32,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            color: ColorRgba::WHITE,
            size: 20.0,
            strength: 1.0,
            hardness: DEFAULT_HARDNESS,
        }
    }
}

impl BrushState {
    /// Builds a brush, clamping every parameter into its valid range.
    pub fn new(color: ColorRgba, size: f32, strength: f32) -> Self {
        let mut brush = Self {
            color,
            ..Self::default()
        };
        brush.set_size(size);
        brush.set_strength(strength);
        brush
    }

    #[inline]
    pub fn color(&self) -> ColorRgba {
        self.color
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn strength(&self) -> f32 {
        self.strength
    }

    #[inline]
    pub fn hardness(&self) -> f32 {
        self.hardness
    }

    pub fn set_color(&mut self, color: ColorRgba) {
        self.color = color;
    }

    pub fn set_size(&mut self, size: f32) {
        if let Some(v) = clamp_finite("size", size, MIN_BRUSH_SIZE, MAX_BRUSH_SIZE) {
            self.size = v;
        }
    }

    pub fn set_strength(&mut self, strength: f32) {
        if let Some(v) = clamp_finite("strength", strength, MIN_BRUSH_STRENGTH, MAX_BRUSH_STRENGTH) {
            self.strength = v;
        }
    }

    pub fn set_hardness(&mut self, hardness: f32) {
        if let Some(v) = clamp_finite("hardness", hardness, 0.0, 1.0) {
            self.hardness = v;
        }
    }

    /// Snapshot for one paint call. `color` overrides the session color
    /// for this stamp only.
    pub fn stamp(&self, center: Vec2, color: Option<ColorRgba>) -> Stamp {
        Stamp {
            center,
            color: color.unwrap_or(self.color),
            size: self.size,
            strength: self.strength,
            hardness: self.hardness,
        }
    }
}

fn clamp_finite(name: &str, value: f32, min: f32, max: f32) -> Option<f32> {
    if !value.is_finite() {
        log::warn!("ignoring non-finite brush {name}: {value}");
        return None;
    }
    Some(value.clamp(min, max))
}

/// One brush application.
///
/// `center` is in normalized surface coordinates; `size` is a radius in texels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stamp {
    pub center: Vec2,
    pub color: ColorRgba,
    pub size: f32,
    pub strength: f32,
    pub hardness: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── clamping ──────────────────────────────────────────────────────────

    #[test]
    fn size_clamps_to_bounds() {
        let mut b = BrushState::default();
        b.set_size(0.0);
        assert_eq!(b.size(), MIN_BRUSH_SIZE);
        b.set_size(-20.0);
        assert_eq!(b.size(), MIN_BRUSH_SIZE);
        b.set_size(10_000.0);
        assert_eq!(b.size(), MAX_BRUSH_SIZE);
        b.set_size(250.0);
        assert_eq!(b.size(), 250.0);
    }

    #[test]
    fn strength_clamps_to_unit_range() {
        let mut b = BrushState::default();
        b.set_strength(-1.0);
        assert_eq!(b.strength(), 0.0);
        b.set_strength(3.5);
        assert_eq!(b.strength(), 1.0);
        b.set_strength(0.25);
        assert_eq!(b.strength(), 0.25);
    }

    #[test]
    fn hardness_clamps_to_unit_range() {
        let mut b = BrushState::default();
        b.set_hardness(2.0);
        assert_eq!(b.hardness(), 1.0);
        b.set_hardness(-0.1);
        assert_eq!(b.hardness(), 0.0);
    }

    #[test]
    fn non_finite_input_keeps_previous_value() {
        let mut b = BrushState::default();
        b.set_size(42.0);
        b.set_size(f32::NAN);
        assert_eq!(b.size(), 42.0);
        b.set_strength(0.5);
        b.set_strength(f32::INFINITY);
        assert_eq!(b.strength(), 0.5);
    }

    #[test]
    fn constructor_clamps() {
        let b = BrushState::new(ColorRgba::RED, 900.0, -2.0);
        assert_eq!(b.size(), MAX_BRUSH_SIZE);
        assert_eq!(b.strength(), 0.0);
        assert_eq!(b.color(), ColorRgba::RED);
    }

    // ── stamps ────────────────────────────────────────────────────────────

    #[test]
    fn stamp_uses_session_color_by_default() {
        let b = BrushState::new(ColorRgba::GREEN, 30.0, 0.5);
        let s = b.stamp(Vec2::new(0.5, 0.5), None);
        assert_eq!(s.color, ColorRgba::GREEN);
        assert_eq!(s.size, 30.0);
        assert_eq!(s.strength, 0.5);
    }

    #[test]
    fn stamp_override_does_not_change_session_color() {
        let b = BrushState::new(ColorRgba::GREEN, 30.0, 0.5);
        let s = b.stamp(Vec2::new(0.1, 0.9), Some(ColorRgba::BLUE));
        assert_eq!(s.color, ColorRgba::BLUE);
        assert_eq!(b.color(), ColorRgba::GREEN);
    }
}
