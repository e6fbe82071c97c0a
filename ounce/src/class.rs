//! Unit classes
//!
//! A class is a closed group of mutually convertible units. Each class has a
//! reference unit that every scale factor in the registry is expressed against:
//! meters, kilograms, degrees, seconds, and an arbitrary reference for rates.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::UnitError;

/// The class of a unit. Conversion is only defined within one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitClass {
    Length,
    Weight,
    Angle,
    Time,
    TimeRate,
}

impl UnitClass {
    /// Every class, in registry order
    pub const ALL: [UnitClass; 5] = [
        UnitClass::Length,
        UnitClass::Weight,
        UnitClass::Angle,
        UnitClass::Time,
        UnitClass::TimeRate,
    ];

    /// Lowercase name used in messages and on the wire
    pub fn name(&self) -> &'static str {
        match self {
            UnitClass::Length => "length",
            UnitClass::Weight => "weight",
            UnitClass::Angle => "angle",
            UnitClass::Time => "time",
            UnitClass::TimeRate => "time_rate",
        }
    }

    /// Symbol of the reference unit (scale 1.0) for this class
    pub fn base_unit(&self) -> &'static str {
        match self {
            UnitClass::Length => "m",
            UnitClass::Weight => "kg",
            UnitClass::Angle => "deg",
            UnitClass::Time => "sec",
            UnitClass::TimeRate => "hours_per_week",
        }
    }
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for UnitClass {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitClass::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| UnitError::UnknownClass(s.to_string()))
    }
}
