//! Percentage value object (whole-number scale, 2 decimals).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A compliance percentage on the 0-100 whole-number scale.
///
/// Values above 100 are legal (over-execution). The value is always finite
/// and non-negative. The exact ratio is kept for classification and
/// filtering; [`value`](Self::value) and the serialized form round to two
/// decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Percentage(f64);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0.0);

    /// Creates a Percentage from a whole-number value (`87.5` = 87.5%).
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::invalid_format(
                "percentage",
                "value must be a finite number",
            ));
        }
        if value < 0.0 {
            return Err(ValidationError::out_of_range(
                "percentage",
                0.0,
                f64::MAX,
                value,
            ));
        }
        Ok(Self(strip_float_noise(value)))
    }

    /// Creates a Percentage from a whole-number value, `None` when not finite or negative.
    pub fn from_whole(value: f64) -> Option<Self> {
        Self::try_new(value).ok()
    }

    /// Creates a Percentage from a fraction (`0.875` = 87.5%).
    pub fn from_fraction(fraction: f64) -> Option<Self> {
        Self::from_whole(fraction * 100.0)
    }

    /// Computes `executed / target * 100`.
    ///
    /// Returns `None` when either side is missing or `target` is not a
    /// positive number, so a zero target never surfaces as Infinity or NaN.
    pub fn of(executed: Option<f64>, target: Option<f64>) -> Option<Self> {
        let (executed, target) = (executed?, target?);
        if target.is_nan() || target <= 0.0 {
            return None;
        }
        Self::from_whole(executed / target * 100.0)
    }

    /// Returns the displayed value on the 0-100 scale, rounded to 2 decimals.
    pub fn value(&self) -> f64 {
        round2(self.0)
    }

    /// Returns the unrounded value; threshold checks compare against this.
    pub fn exact(&self) -> f64 {
        self.0
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for Percentage {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for f64 {
    fn from(p: Percentage) -> Self {
        p.value()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// Drops binary representation error (`28.999999999999996` for 29/100*100)
/// without touching real ratios such as 82.996.
fn strip_float_noise(value: f64) -> f64 {
    let scaled = (value * 1e9).round();
    if scaled.is_finite() {
        scaled / 1e9
    } else {
        value
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_of_rounds_to_two_decimals() {
        let pct = Percentage::of(Some(145.0), Some(150.0)).unwrap();
        assert_eq!(pct.value(), 96.67);
    }

    #[test]
    fn percentage_of_allows_over_execution() {
        let pct = Percentage::of(Some(55.0), Some(50.0)).unwrap();
        assert_eq!(pct.value(), 110.0);
    }

    #[test]
    fn percentage_of_zero_target_is_none() {
        assert!(Percentage::of(Some(10.0), Some(0.0)).is_none());
    }

    #[test]
    fn percentage_of_negative_target_is_none() {
        assert!(Percentage::of(Some(10.0), Some(-5.0)).is_none());
    }

    #[test]
    fn percentage_of_missing_values_is_none() {
        assert!(Percentage::of(None, Some(100.0)).is_none());
        assert!(Percentage::of(Some(100.0), None).is_none());
        assert!(Percentage::of(None, None).is_none());
    }

    #[test]
    fn percentage_of_nan_target_is_none() {
        assert!(Percentage::of(Some(1.0), Some(f64::NAN)).is_none());
    }

    #[test]
    fn percentage_from_fraction_scales_up() {
        assert_eq!(Percentage::from_fraction(0.87).unwrap().value(), 87.0);
        assert_eq!(Percentage::from_fraction(0.005).unwrap().value(), 0.5);
    }

    #[test]
    fn percentage_try_new_rejects_non_finite() {
        assert!(Percentage::try_new(f64::INFINITY).is_err());
        assert!(Percentage::try_new(f64::NAN).is_err());
    }

    #[test]
    fn percentage_try_new_rejects_negative() {
        match Percentage::try_new(-1.0) {
            Err(ValidationError::OutOfRange { field, actual, .. }) => {
                assert_eq!(field, "percentage");
                assert_eq!(actual, -1.0);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
    }

    #[test]
    fn percentage_keeps_exact_ratio_behind_rounded_value() {
        let pct = Percentage::of(Some(82_996.0), Some(100_000.0)).unwrap();
        assert_eq!(pct.value(), 83.0);
        assert!((pct.exact() - 82.996).abs() < 1e-9);

        let json = serde_json::to_string(&Percentage::of(Some(145.0), Some(150.0)).unwrap()).unwrap();
        assert_eq!(json, "96.67");
    }

    #[test]
    fn percentage_of_drops_representation_noise() {
        assert_eq!(Percentage::of(Some(29.0), Some(100.0)).unwrap().exact(), 29.0);
        assert_eq!(Percentage::from_fraction(0.57).unwrap().exact(), 57.0);
    }

    #[test]
    fn percentage_displays_two_decimals() {
        assert_eq!(format!("{}", Percentage::from_whole(96.666).unwrap()), "96.67%");
        assert_eq!(format!("{}", Percentage::from_whole(100.0).unwrap()), "100.00%");
    }

    #[test]
    fn percentage_serializes_as_number() {
        let json = serde_json::to_string(&Percentage::from_whole(87.5).unwrap()).unwrap();
        assert_eq!(json, "87.5");
    }

    #[test]
    fn percentage_deserialization_rejects_negative() {
        assert!(serde_json::from_str::<Percentage>("-3").is_err());
        let pct: Percentage = serde_json::from_str("75").unwrap();
        assert_eq!(pct.value(), 75.0);
    }
}
