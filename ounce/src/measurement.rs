//! Measurement type - an optional value with an optional unit label

use std::fmt;
use serde::{Serialize, Deserialize};

/// A value paired with the unit it is expressed in.
///
/// Either half may be absent: a missing unit means "unitless" and a missing
/// value is carried through conversions untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: Option<f64>,
    pub unit: Option<String>,
}

impl Measurement {
    pub fn new(value: f64, unit: &str) -> Self {
        Measurement {
            value: Some(value),
            unit: Some(unit.to_string()),
        }
    }

    pub fn from_parts(value: Option<f64>, unit: Option<&str>) -> Self {
        Measurement {
            value,
            unit: unit.map(str::to_string),
        }
    }

    /// Neither value nor unit
    pub fn empty() -> Self {
        Measurement::default()
    }

    /// Unit label, with an empty string treated as no unit
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|unit| !unit.is_empty())
    }

    pub fn into_tuple(self) -> (Option<f64>, Option<String>) {
        (self.value, self.unit)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.value, self.unit()) {
            (Some(value), Some(unit)) => write!(f, "{} {}", value, unit),
            (Some(value), None) => write!(f, "{}", value),
            (None, _) => write!(f, "none"),
        }
    }
}
