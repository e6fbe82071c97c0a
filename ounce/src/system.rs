//! Regional unit systems and their per-class default units

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use crate::{Result, UnitClass, UnitError};

/// Name of the system used when the caller does not pick one
pub const DEFAULT_SYSTEM: &str = "metric";

/// Default unit name for each class
pub type DefaultUnits = BTreeMap<UnitClass, String>;

/// A named bundle of default units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    #[default]
    Metric,
    UnitedStates,
}

impl UnitSystem {
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Metric, UnitSystem::UnitedStates];

    pub fn name(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::UnitedStates => "united_states",
        }
    }

    /// Preferred unit for `class` in this system
    pub fn default_unit(&self, class: UnitClass) -> &'static str {
        match (self, class) {
            (UnitSystem::Metric, UnitClass::Length) => "cm",
            (UnitSystem::Metric, UnitClass::Weight) => "kg",
            (UnitSystem::UnitedStates, UnitClass::Length) => "in",
            (UnitSystem::UnitedStates, UnitClass::Weight) => "lb",
            (_, UnitClass::Angle) => "deg",
            (_, UnitClass::Time) => "yr",
            (_, UnitClass::TimeRate) => "hours_per_week",
        }
    }

    /// Built-in defaults for every class
    pub fn defaults(&self) -> DefaultUnits {
        UnitClass::ALL
            .into_iter()
            .map(|class| (class, self.default_unit(class).to_string()))
            .collect()
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for UnitSystem {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self> {
        UnitSystem::ALL
            .into_iter()
            .find(|system| system.name() == s)
            .ok_or_else(|| UnitError::UnknownSystem(s.to_string()))
    }
}

/// Defaults for the named system with `overrides` applied on top.
///
/// Override names are not validated here; an unknown name surfaces when a
/// conversion targets it.
pub fn default_units(system: &str, overrides: &DefaultUnits) -> Result<DefaultUnits> {
    let mut result = system.parse::<UnitSystem>()?.defaults();
    result.extend(overrides.iter().map(|(class, unit)| (*class, unit.clone())));
    Ok(result)
}
