//! Safe casting utilities for converting logical geometry into raster indices

use crate::{Error, Result};

/// Largest surface edge accepted, in device pixels
pub const MAX_SURFACE_DIMENSION: u32 = 16_384;

/// Convert a floating-point surface dimension into a pixel count
///
/// # Errors
///
/// Returns an error if the value is not finite, not positive after rounding,
/// or exceeds [`MAX_SURFACE_DIMENSION`]
#[allow(clippy::cast_possible_truncation)] // Bounds checked before truncation
#[allow(clippy::cast_sign_loss)] // Negative values rejected before the cast
pub fn surface_dimension(value: f64) -> Result<u32> {
    let rounded = value.round();
    if rounded.is_finite() && rounded >= 1.0 && rounded <= f64::from(MAX_SURFACE_DIMENSION) {
        Ok(rounded as u32)
    } else {
        Err(Error::InvalidInput(format!(
            "Surface dimension {value} must be between 1 and {MAX_SURFACE_DIMENSION}"
        )))
    }
}

/// Convert a logical coordinate to the `f32` precision the rasterizer uses
///
/// Values beyond the `f32` range saturate to infinity; NaN stays NaN.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Frame coordinates are far inside f32 range
pub fn f64_to_f32(value: f64) -> f32 {
    value as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_surface_dimension() {
        assert_eq!(surface_dimension(640.0).unwrap(), 640);
        assert_eq!(surface_dimension(639.6).unwrap(), 640);
        assert_eq!(surface_dimension(1.0).unwrap(), 1);

        assert!(surface_dimension(0.0).is_err());
        assert!(surface_dimension(-5.0).is_err());
        assert!(surface_dimension(f64::NAN).is_err());
        assert!(surface_dimension(f64::INFINITY).is_err());
        assert!(surface_dimension(f64::from(MAX_SURFACE_DIMENSION) + 1.0).is_err());
    }

    #[test]
    fn test_f64_to_f32() {
        assert_eq!(f64_to_f32(640.5), 640.5_f32);
        assert_eq!(f64_to_f32(-12.25), -12.25_f32);
        assert!(f64_to_f32(f64::NAN).is_nan());
        assert_eq!(f64_to_f32(f64::MAX), f32::INFINITY);
    }

    // Property-based tests
    proptest! {
        #[test]
        fn prop_f64_to_f32_stays_close_on_frame_coordinates(value in -20_000.0..20_000.0f64) {
            let converted = f64::from(f64_to_f32(value));
            prop_assert!((converted - value).abs() <= 1e-3);
        }

        #[test]
        fn prop_surface_dimension_round_trips_integers(value in 1..=MAX_SURFACE_DIMENSION) {
            prop_assert_eq!(surface_dimension(f64::from(value)).unwrap(), value);
        }
    }
}
