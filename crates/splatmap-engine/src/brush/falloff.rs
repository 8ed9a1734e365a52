/// Radial brush falloff at distance `d` (texels) from the stamp center.
///
/// Returns `1` inside the hard core of radius `hardness * size`, then a
/// smoothstep decay that reaches `0` at `size`. The blend shader evaluates the
/// same expression; keep the two in sync.
#[inline]
pub fn falloff(d: f32, size: f32, hardness: f32) -> f32 {
    let inner = size * hardness;
    if d <= inner {
        return 1.0;
    }
    if d >= size {
        return 0.0;
    }
    let t = (d - inner) / (size - inner);
    1.0 - t * t * (3.0 - 2.0 * t)
}

/// Blend weight of a stamp at distance `d`.
#[inline]
pub fn stamp_weight(d: f32, size: f32, hardness: f32, strength: f32) -> f32 {
    strength * falloff(d, size, hardness)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_is_full_weight() {
        assert_eq!(falloff(0.0, 50.0, 0.8), 1.0);
        assert_eq!(falloff(40.0, 50.0, 0.8), 1.0);
    }

    #[test]
    fn reaches_zero_at_size() {
        assert_eq!(falloff(50.0, 50.0, 0.8), 0.0);
        assert_eq!(falloff(80.0, 50.0, 0.8), 0.0);
    }

    #[test]
    fn midpoint_of_ramp_is_half() {
        let w = falloff(45.0, 50.0, 0.8);
        assert!((w - 0.5).abs() < 1e-6, "{w}");
    }

    #[test]
    fn decays_monotonically() {
        let mut prev = 1.0;
        for i in 0..=100 {
            let w = falloff(i as f32 * 0.6, 50.0, 0.5);
            assert!(w <= prev + f32::EPSILON);
            prev = w;
        }
    }

    #[test]
    fn zero_hardness_is_pure_smoothstep() {
        assert_eq!(falloff(0.0, 10.0, 0.0), 1.0);
        assert!((falloff(5.0, 10.0, 0.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn full_hardness_is_a_disc() {
        assert_eq!(falloff(9.99, 10.0, 1.0), 1.0);
        assert_eq!(falloff(10.0, 10.0, 1.0), 1.0);
        assert_eq!(falloff(10.01, 10.0, 1.0), 0.0);
    }

    #[test]
    fn zero_strength_has_no_weight() {
        assert_eq!(stamp_weight(0.0, 50.0, 0.8, 0.0), 0.0);
    }
}
