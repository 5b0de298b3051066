//! Rounding and formatting helpers for human-scale measurements.

use crate::{constants::INCHES_PER_FOOT, Error, Result};

/// Round a finite f64 to the nearest i64, halves away from zero
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i64 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
#[allow(clippy::cast_precision_loss)] // MIN/MAX bounds checking is approximate
pub fn round_to_i64(value: f64) -> Result<i64> {
    let rounded = value.round();
    if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded <= i64::MAX as f64 {
        Ok(rounded as i64)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely rounded to i64"
        )))
    }
}

/// Convert a 0..1 score to a whole percentage, clamped to 0..=100
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to 0..=100
pub fn to_percent(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    (score * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Format whole inches, e.g. `38"`
///
/// # Errors
///
/// Returns an error if the value cannot be rounded
pub fn format_inches(inches: f64) -> Result<String> {
    Ok(format!("{}\"", round_to_i64(inches)?))
}

/// Format a length in inches as feet and inches, e.g. `5'9"`.
///
/// Remaining inches that round up to a full foot carry over, so 71.6
/// inches renders as `6'0"` rather than `5'12"`.
///
/// # Errors
///
/// Returns an error if the value is not finite or negative
pub fn format_feet_inches(inches: f64) -> Result<String> {
    if !inches.is_finite() || inches < 0.0 {
        return Err(Error::InvalidInput(format!(
            "Height {inches} must be a finite, non-negative length"
        )));
    }

    let total = round_to_i64(inches)?;
    let feet = total / INCHES_PER_FOOT;
    let rest = total % INCHES_PER_FOOT;
    Ok(format!("{feet}'{rest}\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_to_i64() {
        assert_eq!(round_to_i64(2.5).unwrap(), 3);
        assert_eq!(round_to_i64(2.49).unwrap(), 2);
        assert_eq!(round_to_i64(-2.5).unwrap(), -3);
        assert!(round_to_i64(f64::NAN).is_err());
        assert!(round_to_i64(f64::INFINITY).is_err());
        assert!(round_to_i64(1e300).is_err());
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.875), 88);
        assert_eq!(to_percent(1.2), 100);
        assert_eq!(to_percent(-0.3), 0);
        assert_eq!(to_percent(f64::NAN), 0);
    }

    #[test]
    fn test_format_inches() {
        assert_eq!(format_inches(37.6).unwrap(), "38\"");
        assert_eq!(format_inches(0.0).unwrap(), "0\"");
    }

    #[test]
    fn test_format_feet_inches() {
        assert_eq!(format_feet_inches(69.0).unwrap(), "5'9\"");
        assert_eq!(format_feet_inches(71.6).unwrap(), "6'0\"");
        assert_eq!(format_feet_inches(11.4).unwrap(), "0'11\"");
        assert!(format_feet_inches(-1.0).is_err());
        assert!(format_feet_inches(f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn prop_round_within_half(value in -1.0e9f64..1.0e9) {
            let rounded = round_to_i64(value).unwrap();
            prop_assert!((rounded as f64 - value).abs() <= 0.5);
        }

        #[test]
        fn prop_feet_inches_rest_below_twelve(inches in 0.0f64..200.0) {
            let text = format_feet_inches(inches).unwrap();
            let (feet, rest) = text.trim_end_matches('"').split_once('\'').unwrap();
            let feet: i64 = feet.parse().unwrap();
            let rest: i64 = rest.parse().unwrap();
            prop_assert!((0..12).contains(&rest));
            prop_assert_eq!(feet * 12 + rest, round_to_i64(inches).unwrap());
        }

        #[test]
        fn prop_percent_in_range(score in any::<f64>()) {
            prop_assert!(to_percent(score) <= 100);
        }
    }
}
