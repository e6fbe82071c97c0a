//! Unit representation with its scale factor

use std::fmt;
use serde::Serialize;
use crate::UnitClass;

/// A registered unit: its class and the factor to the class reference unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitDefinition {
    /// Canonical symbol (e.g., "m", "kg", "sec")
    pub symbol: &'static str,
    /// Class the unit belongs to
    pub class: UnitClass,
    /// Multiplier converting one of this unit into the class reference unit
    pub scale: f64,
}

impl UnitDefinition {
    pub const fn new(symbol: &'static str, class: UnitClass, scale: f64) -> Self {
        UnitDefinition { symbol, class, scale }
    }

    /// Check if this is the reference unit of its class
    pub fn is_base(&self) -> bool {
        self.scale == 1.0
    }

    /// Check if two units can be converted into one another
    pub fn is_compatible(&self, other: &UnitDefinition) -> bool {
        self.class == other.class
    }
}

impl fmt::Display for UnitDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
