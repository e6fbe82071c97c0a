//! Conversion factors and value conversion

use crate::{
    class_of, default_units, DefaultUnits, Measurement, Result, UnitClass, UnitError, UNITS,
};

fn is_missing(unit: Option<&str>) -> bool {
    unit.map_or(true, str::is_empty)
}

/// Multiplier converting a value in `from` into `to`.
///
/// Two missing units, or two identical names, give `1.0` without touching
/// the registry. When `required` is set, `from` must belong to that class.
///
/// ```
/// let value_in_cm = 25.0;
/// assert_eq!(value_in_cm * ounce::factor(Some("cm"), Some("mm"), None).unwrap(), 250.0);
/// ```
pub fn factor(from: Option<&str>, to: Option<&str>, required: Option<UnitClass>) -> Result<f64> {
    if is_missing(from) && is_missing(to) {
        return Ok(1.0);
    }
    if from == to {
        return Ok(1.0);
    }

    let from_name = from.unwrap_or_default();
    let to_name = to.unwrap_or_default();
    let from_unit = UNITS.lookup(from_name)?;
    let to_unit = UNITS.lookup(to_name)?;

    if !from_unit.is_compatible(to_unit) {
        return Err(UnitError::IncompatibleUnits {
            from: from_name.to_string(),
            to: to_name.to_string(),
        });
    }
    if let Some(required) = required {
        if from_unit.class != required {
            return Err(UnitError::ClassMismatch {
                required,
                actual: from_unit.class,
            });
        }
    }

    Ok(from_unit.scale / to_unit.scale)
}

/// Convert a value from one unit to another.
///
/// The factor is resolved before the value is inspected, so incompatible
/// units fail even when `value` is `None`. A `None` value yields an empty
/// measurement: the unit is dropped as well.
pub fn convert(
    value: Option<f64>,
    from: Option<&str>,
    to: Option<&str>,
    required: Option<UnitClass>,
) -> Result<Measurement> {
    let this_factor = factor(from, to, required)?;
    Ok(match value {
        None => Measurement::empty(),
        Some(value) => Measurement::from_parts(Some(value * this_factor), to),
    })
}

/// Convert every value in `values`. Unlike [`convert`], returns bare numbers.
pub fn convert_many(values: &[f64], from: Option<&str>, to: Option<&str>) -> Result<Vec<f64>> {
    let scale = factor(from, to, None)?;
    Ok(values.iter().map(|x| scale * x).collect())
}

/// Convert to the default unit of `from`'s class.
///
/// A unitless value passes through as-is without consulting `defaults`.
pub fn convert_to_default(
    value: Option<f64>,
    from: Option<&str>,
    defaults: &DefaultUnits,
) -> Result<Measurement> {
    match class_of(from)? {
        Some(class) => {
            let to = defaults
                .get(&class)
                .ok_or(UnitError::MissingDefault(class))?;
            convert(value, from, Some(to.as_str()), None)
        }
        None => Ok(Measurement::from_parts(value, from)),
    }
}

/// Convert to the default unit of `from`'s class in the named unit system
pub fn convert_to_system_default(
    value: Option<f64>,
    from: Option<&str>,
    system: &str,
) -> Result<Measurement> {
    let defaults = default_units(system, &DefaultUnits::new())?;
    convert_to_default(value, from, &defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use crate::{all_unit_names, units_in_class, DEFAULT_SYSTEM};

    fn assert_close(actual: f64, expected: f64, rel: f64) {
        let tolerance = rel * expected.abs().max(1e-12);
        assert!(
            (actual - expected).abs() <= tolerance,
            "{} is not within {} of {}",
            actual,
            rel,
            expected
        );
    }

    fn value(measurement: Measurement) -> f64 {
        measurement.value.unwrap()
    }

    #[test]
    fn test_factor_identity() {
        for name in all_unit_names() {
            assert_eq!(factor(Some(name), Some(name), None), Ok(1.0));
        }
    }

    #[test]
    fn test_factor_round_trip() {
        for class in UnitClass::ALL {
            let names = units_in_class(class);
            for &a in &names {
                for &b in &names {
                    let there = factor(Some(a), Some(b), None).unwrap();
                    let back = factor(Some(b), Some(a), None).unwrap();
                    assert_close(there * back, 1.0, 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_factor_apples_and_oranges() {
        let err = factor(Some("stone"), Some("fathoms"), None).unwrap_err();
        assert_eq!(
            err,
            UnitError::IncompatibleUnits {
                from: "stone".to_string(),
                to: "fathoms".to_string(),
            }
        );
        assert_eq!(
            err.to_string(),
            "Can't convert between apples and oranges (stone and fathoms)"
        );
    }

    #[test]
    fn test_factor_missing_units() {
        for (from, to) in [(None, Some("")), (Some(""), None), (None, None), (Some(""), Some(""))] {
            assert_eq!(factor(from, to, None), Ok(1.0));
        }
    }

    #[test]
    fn test_factor_one_side_missing() {
        assert_eq!(
            factor(Some("cm"), None, None),
            Err(UnitError::UnknownUnit(String::new()))
        );
        assert_eq!(
            factor(Some(""), Some("cm"), None),
            Err(UnitError::UnknownUnit(String::new()))
        );
    }

    #[test]
    fn test_factor_unknown_unit() {
        assert_eq!(
            factor(Some("furlong"), Some("m"), None),
            Err(UnitError::UnknownUnit("furlong".to_string()))
        );
        // Identical names short-circuit before lookup
        assert_eq!(factor(Some("furlong"), Some("furlong"), None), Ok(1.0));
    }

    #[test]
    fn test_factor() {
        assert_eq!(factor(Some("in"), Some("cm"), None), Ok(2.54));
        assert_close(factor(Some("year"), Some("min"), None).unwrap(), 525600.0, 1e-3);
        assert_eq!(
            factor(Some("sec"), Some("hr"), Some(UnitClass::Time)),
            Ok(1.0 / 3600.0)
        );
    }

    #[test]
    fn test_factor_required_class() {
        let err = factor(Some("sec"), Some("hr"), Some(UnitClass::Length)).unwrap_err();
        assert_eq!(
            err,
            UnitError::ClassMismatch {
                required: UnitClass::Length,
                actual: UnitClass::Time,
            }
        );
        assert_eq!(err.to_string(), "Units class must be length, but got time");
    }

    #[test]
    fn test_incompatible_checked_before_required_class() {
        assert!(matches!(
            factor(Some("sec"), Some("m"), Some(UnitClass::Length)),
            Err(UnitError::IncompatibleUnits { .. })
        ));
    }

    #[test]
    fn test_convert() {
        assert_eq!(
            convert(Some(25.0), Some("cm"), Some("mm"), None),
            Ok(Measurement::new(250.0, "mm"))
        );
        assert_eq!(
            convert(Some(180.0), Some("deg"), Some("rad"), None),
            Ok(Measurement::new(PI, "rad"))
        );

        let feet = convert(Some(-10.0), Some("ft"), Some("in"), None).unwrap();
        assert_eq!(feet.unit.as_deref(), Some("in"));
        assert_close(value(feet), -120.0, 1e-9);
    }

    #[test]
    fn test_convert_none_value() {
        assert_eq!(
            convert(None, Some("ft"), Some("in"), None),
            Ok(Measurement::empty())
        );
    }

    #[test]
    fn test_convert_none_value_still_checks_units() {
        assert!(matches!(
            convert(None, Some("ft"), Some("kg"), None),
            Err(UnitError::IncompatibleUnits { .. })
        ));
        assert!(matches!(
            convert(None, Some("ft"), Some("in"), Some(UnitClass::Weight)),
            Err(UnitError::ClassMismatch { .. })
        ));
    }

    #[test]
    fn test_convert_round_trip() {
        for class in UnitClass::ALL {
            let names = units_in_class(class);
            for &a in &names {
                for &b in &names {
                    let there = convert(Some(42.5), Some(a), Some(b), None).unwrap();
                    let back = convert(there.value, Some(b), Some(a), None).unwrap();
                    assert_close(value(back), 42.5, 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_conversion_factors() {
        let convert_value =
            |v: f64, from: &str, to: &str| value(convert(Some(v), Some(from), Some(to), None).unwrap());

        assert_eq!(convert_value(25.0, "cm", "m"), 0.25);
        assert_eq!(convert_value(25.0, "cm", "cm"), 25.0);
        assert_eq!(convert_value(25.0, "cm", "mm"), 250.0);
        assert_close(convert_value(25.0, "cm", "in"), 9.8425197, 1e-6);
        assert_close(convert_value(25.0, "cm", "ft"), 0.82021, 1e-5);
        assert_close(convert_value(25.0, "cm", "fathoms"), 0.136701662, 1e-6);
        assert_close(convert_value(25.0, "cm", "cubits"), 0.546806649, 1e-6);
        assert_eq!(convert_value(10.0, "kg", "kg"), 10.0);
        assert_eq!(convert_value(1.0, "kg", "g"), 1000.0);
        assert_eq!(convert_value(10.0, "kg", "lbs"), 22.0462);
        assert_eq!(convert_value(10.0, "kg", "stone"), 1.57473);
        assert_eq!(convert_value(90.0, "deg", "rad"), PI / 2.0);
        assert_eq!(convert_value(90.0, "deg", "deg"), 90.0);
        assert_eq!(convert_value(30.0, "min", "sec"), 30.0 * 60.0);
        assert_eq!(convert_value(30.0, "min", "minutes"), 30.0);
        assert_eq!(convert_value(30.0, "min", "hours"), 0.5);
        assert_eq!(convert_value(2.0, "days", "min"), 2.0 * 24.0 * 60.0);
        assert_eq!(convert_value(1.0, "years", "min"), 525948.48);
    }

    #[test]
    fn test_convert_many() {
        assert_eq!(
            convert_many(&[10.0, 20.0, 30.0], Some("cm"), Some("mm")),
            Ok(vec![100.0, 200.0, 300.0])
        );
        assert_eq!(convert_many(&[], Some("cm"), Some("mm")), Ok(vec![]));
        assert!(convert_many(&[1.0], Some("cm"), Some("kg")).is_err());
    }

    #[test]
    fn test_convert_to_default() {
        let defaults = DefaultUnits::from([
            (UnitClass::Length, "in".to_string()),
            (UnitClass::Weight, "lb".to_string()),
        ]);
        let inches = convert_to_default(Some(100.0), Some("cm"), &defaults).unwrap();
        assert_eq!(inches.unit.as_deref(), Some("in"));
        assert_close(value(inches), 39.3701, 1e-6);

        assert_eq!(
            convert_to_default(Some(1.0), Some("deg"), &defaults),
            Err(UnitError::MissingDefault(UnitClass::Angle))
        );
    }

    #[test]
    fn test_convert_to_default_unitless_ignores_defaults() {
        let defaults = DefaultUnits::new();
        assert_eq!(
            convert_to_default(Some(3.0), Some(""), &defaults),
            Ok(Measurement::new(3.0, ""))
        );
        assert_eq!(
            convert_to_default(Some(3.0), None, &defaults),
            Ok(Measurement::from_parts(Some(3.0), None))
        );
    }

    #[test]
    fn test_convert_to_system_default() {
        assert_eq!(
            convert_to_system_default(Some(10.0), Some("mm"), DEFAULT_SYSTEM),
            Ok(Measurement::new(1.0, "cm"))
        );

        let inches = convert_to_system_default(Some(10.0), Some("mm"), "united_states").unwrap();
        assert_eq!(inches.unit.as_deref(), Some("in"));
        assert_close(value(inches), 0.393701, 1e-6);

        let pounds = convert_to_system_default(Some(10.0), Some("stone"), "united_states").unwrap();
        assert_eq!(pounds.unit.as_deref(), Some("lb"));
        assert_close(value(pounds), 140.0, 1e-4);

        assert_eq!(
            convert_to_system_default(Some(10.0), Some(""), DEFAULT_SYSTEM),
            Ok(Measurement::new(10.0, ""))
        );
    }

    #[test]
    fn test_convert_to_system_default_unknown_system() {
        assert_eq!(
            convert_to_system_default(Some(10.0), Some("mm"), "imperial"),
            Err(UnitError::UnknownSystem("imperial".to_string()))
        );
    }
}
