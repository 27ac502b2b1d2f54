//! Overlay plan computation
//!
//! Maps the user-facing 0-100 intensity to compositing parameters. The
//! curve is perceptual rather than linear: a `^0.7` power curve up to the
//! transition point, then a linear ramp to full opacity so that the
//! maximum setting is a clean solid fill. Intensities at or below the
//! transition point composite with multiply (darkening tint); above it
//! the overlay switches to normal source-over as it ramps to opaque.

use super::OverlayError;
use super::color::ColorName;

/// Intensity above which the overlay ramps from the power curve to opaque
const TRANSITION_START: u8 = 50;

/// Exponent of the perceptual intensity curve
const CURVE_EXPONENT: f32 = 0.7;

/// Pixel combination rule for the overlay layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Standard source-over
    Normal,
    /// Channel-wise product with the source
    Multiply,
}

/// Compositing parameters derived from a color and intensity.
///
/// Ephemeral: built per request and consumed by the composite stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPlan {
    /// Overlay opacity in [0, 1]
    pub alpha: f32,
    /// How the overlay combines with source pixels
    pub blend: BlendMode,
    /// Flat fill color
    pub fill: [u8; 3],
}

/// Fraction of the ramp from the power curve toward full opacity,
/// clamped to [0, 1]. Zero at and below the transition start.
fn transition_factor(intensity: u8) -> f32 {
    let t = (intensity as f32 - TRANSITION_START as f32)
        / (100.0 - TRANSITION_START as f32);
    t.clamp(0.0, 1.0)
}

/// Map intensity to overlay alpha.
///
/// `base = (intensity/100)^0.7`, blended linearly toward 1.0 above the
/// transition point. Exactly 0.0 at intensity 0 and exactly 1.0 at 100.
pub fn compute_alpha(intensity: u8) -> f32 {
    let base = (intensity as f32 / 100.0).powf(CURVE_EXPONENT);
    let t = transition_factor(intensity);
    base * (1.0 - t) + t
}

/// Select the blend mode for an intensity: multiply while the transition
/// factor is zero, normal once the ramp toward opacity begins.
pub fn blend_mode(intensity: u8) -> BlendMode {
    if transition_factor(intensity) > 0.0 {
        BlendMode::Normal
    } else {
        BlendMode::Multiply
    }
}

impl OverlayPlan {
    /// Build a plan from a palette color and a raw intensity.
    ///
    /// The intensity must be an integer in [0, 100]; out-of-range values
    /// fail with `InvalidIntensity` (fractional values are rejected at
    /// parse time, never truncated).
    pub fn build(color: ColorName, intensity: i64) -> Result<Self, OverlayError> {
        if !(0..=100).contains(&intensity) {
            return Err(OverlayError::InvalidIntensity(intensity));
        }
        let intensity = intensity as u8;

        // Intensity 100 is a distinguished solid fill: alpha 1.0 with
        // normal blending, so the output is the flat color rather than a
        // luminance-dependent multiply product.
        Ok(Self {
            alpha: compute_alpha(intensity),
            blend: blend_mode(intensity),
            fill: color.rgb(),
        })
    }

    /// Whether this plan replaces every pixel with the flat fill color
    pub fn is_solid_fill(&self) -> bool {
        self.alpha >= 1.0 && self.blend == BlendMode::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_endpoints() {
        assert_eq!(compute_alpha(0), 0.0);
        assert_eq!(compute_alpha(100), 1.0);
    }

    #[test]
    fn test_alpha_at_transition_is_pure_base_curve() {
        // No transition blending at exactly 50
        let expected = 0.5f32.powf(0.7);
        assert_eq!(compute_alpha(50), expected);
    }

    #[test]
    fn test_alpha_monotone_non_decreasing() {
        let mut prev = compute_alpha(0);
        for i in 1..=100u8 {
            let a = compute_alpha(i);
            assert!(a >= prev, "alpha decreased at intensity {}", i);
            prev = a;
        }
    }

    #[test]
    fn test_alpha_stays_in_unit_interval() {
        for i in 0..=100u8 {
            let a = compute_alpha(i);
            assert!((0.0..=1.0).contains(&a), "alpha out of range at {}", i);
        }
    }

    #[test]
    fn test_blend_mode_boundary() {
        for i in 0..=50u8 {
            assert_eq!(blend_mode(i), BlendMode::Multiply, "intensity {}", i);
        }
        for i in 51..=100u8 {
            assert_eq!(blend_mode(i), BlendMode::Normal, "intensity {}", i);
        }
    }

    #[test]
    fn test_build_rejects_out_of_range() {
        assert!(matches!(
            OverlayPlan::build(ColorName::Pink, -1),
            Err(OverlayError::InvalidIntensity(-1))
        ));
        assert!(matches!(
            OverlayPlan::build(ColorName::Pink, 150),
            Err(OverlayError::InvalidIntensity(150))
        ));
    }

    #[test]
    fn test_build_full_intensity_is_solid_fill() {
        let plan = OverlayPlan::build(ColorName::Blue, 100).unwrap();
        assert_eq!(plan.alpha, 1.0);
        assert_eq!(plan.blend, BlendMode::Normal);
        assert_eq!(plan.fill, [0x00, 0x00, 0xFF]);
        assert!(plan.is_solid_fill());
    }

    #[test]
    fn test_build_mid_intensity() {
        let plan = OverlayPlan::build(ColorName::Pink, 30).unwrap();
        assert_eq!(plan.blend, BlendMode::Multiply);
        assert!(plan.alpha > 0.0 && plan.alpha < 1.0);
        assert!(!plan.is_solid_fill());
    }
}
