//! Rounded metric and US summaries of a measurement

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::{convert_to_system_default, Measurement, Result, UnitError, UnitSystem};

/// Rounding increment used for a unit when no precision is given
fn default_increment(unit: Option<&str>) -> f64 {
    match unit {
        Some("cm") => 0.5,
        Some("in") => 0.25,
        Some("kg") => 0.5,
        Some("lb") => 1.0,
        Some("yr") => 1.0,
        _ => 0.1,
    }
}

/// Round `value` to the nearest multiple of `nearest`, ties to even.
///
/// Divides by the reciprocal instead of multiplying by `nearest`, which
/// keeps results like `3.9` from picking up a stray last digit.
///
/// ```
/// assert_eq!(ounce::round_to(3.8721, 0.05), 3.85);
/// assert_eq!(ounce::round_to(3.8721, 0.1), 3.9);
/// assert_eq!(ounce::round_to(3.8725, 0.25), 3.75);
/// assert_eq!(ounce::round_to(3.8725, 2.0), 4.0);
/// ```
pub fn round_to(value: f64, nearest: f64) -> f64 {
    let reciprocal = 1.0 / nearest;
    (value / nearest).round_ties_even() / reciprocal
}

/// The same measurement in metric and US default units, rounded for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prettified {
    pub metric_value: f64,
    pub metric_unit: Option<String>,
    pub us_value: f64,
    pub us_unit: Option<String>,
}

impl Prettified {
    /// `(metric value, metric unit, US value, US unit)`
    pub fn into_tuple(self) -> (f64, Option<String>, f64, Option<String>) {
        (self.metric_value, self.metric_unit, self.us_value, self.us_unit)
    }
}

impl fmt::Display for Prettified {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metric = Measurement::from_parts(Some(self.metric_value), self.metric_unit.as_deref());
        let us = Measurement::from_parts(Some(self.us_value), self.us_unit.as_deref());
        write!(f, "{} ({})", metric, us)
    }
}

/// Increment for rounding to `places` decimal places
fn precision_increment(places: u32) -> Result<f64> {
    let nearest = i32::try_from(places)
        .map(|places| 1.0 / 10f64.powi(places))
        .unwrap_or(0.0);
    if nearest > 0.0 && nearest.is_finite() {
        Ok(nearest)
    } else {
        Err(UnitError::InvalidPrecision(places))
    }
}

/// Convert `value` to the metric and US defaults of its class and round both.
///
/// Each result is rounded to an increment that suits its unit (half
/// centimeters, quarter inches, whole pounds, ...). An explicit `precision`
/// in decimal places replaces those increments for both results; a precision
/// too fine to round a finite value to a finite result is an error.
pub fn prettify(value: f64, unit: Option<&str>, precision: Option<u32>) -> Result<Prettified> {
    let fixed_increment = precision.map(precision_increment).transpose()?;

    let round_value = |measurement: Measurement| -> Result<(f64, Option<String>)> {
        let nearest =
            fixed_increment.unwrap_or_else(|| default_increment(measurement.unit.as_deref()));
        // Conversions of a present value always yield a present value
        let converted = measurement.value.unwrap_or(value);
        let rounded = round_to(converted, nearest);
        if converted.is_finite() && !rounded.is_finite() {
            if let Some(places) = precision {
                return Err(UnitError::InvalidPrecision(places));
            }
        }
        Ok((rounded, measurement.unit))
    };

    let (metric_value, metric_unit) =
        round_value(convert_to_system_default(Some(value), unit, UnitSystem::Metric.name())?)?;
    let (us_value, us_unit) =
        round_value(convert_to_system_default(Some(value), unit, UnitSystem::UnitedStates.name())?)?;

    Ok(Prettified {
        metric_value,
        metric_unit,
        us_value,
        us_unit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pretty(value: f64, unit: &str, precision: Option<u32>) -> (f64, String, f64, String) {
        let p = prettify(value, Some(unit), precision).unwrap();
        (
            p.metric_value,
            p.metric_unit.unwrap_or_default(),
            p.us_value,
            p.us_unit.unwrap_or_default(),
        )
    }

    fn expected(metric: f64, metric_unit: &str, us: f64, us_unit: &str) -> (f64, String, f64, String) {
        (metric, metric_unit.to_string(), us, us_unit.to_string())
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.8721, 0.05), 3.85);
        assert_eq!(round_to(3.8721, 0.1), 3.9);
        assert_eq!(round_to(3.8725, 0.25), 3.75);
        assert_eq!(round_to(3.8725, 2.0), 4.0);
    }

    #[test]
    fn test_round_to_uses_reciprocal() {
        // Multiplying back by the increment gives 3.9000000000000004
        assert_eq!(round_to(3.9, 0.1), 3.9);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(2.5, 1.0), 2.0);
        assert_eq!(round_to(3.5, 1.0), 4.0);
        assert_eq!(round_to(-2.5, 1.0), -2.0);
    }

    #[test]
    fn test_prettify() {
        assert_eq!(pretty(182.13992, "cm", None), expected(182.0, "cm", 71.75, "in"));
        assert_eq!(pretty(1821.3992, "mm", None), expected(182.0, "cm", 71.75, "in"));
    }

    #[test]
    fn test_prettify_negative() {
        assert_eq!(pretty(-182.13992, "cm", None), expected(-182.0, "cm", -71.75, "in"));
    }

    #[test]
    fn test_prettify_precision() {
        assert_eq!(pretty(182.13992, "cm", Some(1)), expected(182.1, "cm", 71.7, "in"));
        assert_eq!(pretty(182.13992, "cm", Some(2)), expected(182.14, "cm", 71.71, "in"));
        assert_eq!(pretty(182.13992, "cm", Some(4)), expected(182.1399, "cm", 71.7086, "in"));
    }

    #[test]
    fn test_prettify_precision_out_of_range() {
        for places in [309, u32::MAX] {
            assert_eq!(
                prettify(182.13992, Some("cm"), Some(places)),
                Err(UnitError::InvalidPrecision(places))
            );
        }
    }

    #[test]
    fn test_prettify_precision_overflowing_quotient() {
        // 1e-308 is representable, but 182 / 1e-308 is not
        assert_eq!(
            prettify(182.13992, Some("cm"), Some(308)),
            Err(UnitError::InvalidPrecision(308))
        );
    }

    #[test]
    fn test_prettify_large_valid_precision() {
        let p = prettify(182.13992, Some("cm"), Some(12)).unwrap();
        assert!((p.metric_value - 182.13992).abs() < 1e-9);
    }

    #[test]
    fn test_prettify_weight() {
        assert_eq!(pretty(10.0, "stone", None), expected(63.5, "kg", 140.0, "lb"));
    }

    #[test]
    fn test_prettify_unitless() {
        let p = prettify(3.14159, Some(""), None).unwrap();
        assert_eq!(p.metric_value, 3.1);
        assert_eq!(p.metric_unit.as_deref(), Some(""));
        assert_eq!(p.us_value, 3.1);
    }

    #[test]
    fn test_prettify_unknown_unit() {
        assert_eq!(
            prettify(1.0, Some("furlong"), None),
            Err(UnitError::UnknownUnit("furlong".to_string()))
        );
    }

    #[test]
    fn test_into_tuple_order() {
        let p = prettify(182.13992, Some("cm"), None).unwrap();
        assert_eq!(
            p.into_tuple(),
            (182.0, Some("cm".to_string()), 71.75, Some("in".to_string()))
        );
    }

    #[test]
    fn test_display() {
        let p = prettify(182.13992, Some("cm"), None).unwrap();
        assert_eq!(p.to_string(), "182 cm (71.75 in)");
    }
}
