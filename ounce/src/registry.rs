//! Unit definitions - every supported unit and its synonyms, by class

use std::collections::HashMap;
use std::f64::consts::PI;
use std::sync::LazyLock;
use crate::{Result, UnitClass, UnitDefinition, UnitError};

/// Global unit registry
pub static UNITS: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

/// Registry of all known units
pub struct UnitRegistry {
    units: HashMap<&'static str, UnitDefinition>,
    aliases: HashMap<&'static str, &'static str>,
    /// Every name, canonical or alias, in registration order
    names: Vec<&'static str>,
}

impl UnitRegistry {
    fn new() -> Self {
        let mut registry = UnitRegistry {
            units: HashMap::new(),
            aliases: HashMap::new(),
            names: Vec::new(),
        };
        registry.register_all_units();
        tracing::debug!(
            units = registry.units.len(),
            names = registry.names.len(),
            "unit registry initialized"
        );
        registry
    }

    /// Get a unit by symbol or alias
    pub fn get(&self, name: &str) -> Option<&UnitDefinition> {
        if let Some(unit) = self.units.get(name) {
            return Some(unit);
        }
        self.aliases
            .get(name)
            .and_then(|canonical| self.units.get(canonical))
    }

    /// Get a unit by symbol or alias, failing on unknown names
    pub fn lookup(&self, name: &str) -> Result<&UnitDefinition> {
        self.get(name)
            .ok_or_else(|| UnitError::UnknownUnit(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered names, synonyms included
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All unit names, synonyms included
    pub fn names(&self) -> &[&'static str] {
        &self.names
    }

    /// All names whose unit belongs to `class`
    pub fn by_class(&self, class: UnitClass) -> Vec<&'static str> {
        self.names
            .iter()
            .copied()
            .filter(|name| self.get(name).is_some_and(|unit| unit.class == class))
            .collect()
    }

    /// Classes that have at least one registered unit
    pub fn classes(&self) -> Vec<UnitClass> {
        UnitClass::ALL
            .into_iter()
            .filter(|class| self.units.values().any(|unit| unit.class == *class))
            .collect()
    }

    fn register(&mut self, symbol: &'static str, class: UnitClass, scale: f64) {
        self.units.insert(symbol, UnitDefinition::new(symbol, class, scale));
        self.names.push(symbol);
    }

    fn alias(&mut self, alias: &'static str, symbol: &'static str) {
        self.aliases.insert(alias, symbol);
        self.names.push(alias);
    }

    fn register_all_units(&mut self) {
        self.register_length_units();
        self.register_weight_units();
        self.register_angle_units();
        self.register_time_units();
        self.register_time_rate_units();
    }

    fn register_length_units(&mut self) {
        use UnitClass::Length;

        self.register("m", Length, 1.0);
        self.alias("meter", "m");
        self.alias("meters", "m");

        self.register("mm", Length, 1.0 / 1000.0);
        self.alias("millimeter", "mm");
        self.alias("millimeters", "mm");

        self.register("cm", Length, 1.0 / 100.0);
        self.alias("centimeter", "cm");
        self.alias("centimeters", "cm");

        self.register("in", Length, 0.0254);
        self.alias("inch", "in");
        self.alias("inches", "in");

        self.register("ft", Length, 0.3048);
        self.alias("foot", "ft");
        self.alias("feet", "ft");

        self.register("fathoms", Length, 1.8288);
        self.register("cubits", Length, 0.4572);
    }

    fn register_weight_units(&mut self) {
        use UnitClass::Weight;

        self.register("kg", Weight, 1.0);
        self.alias("kilograms", "kg");

        self.register("g", Weight, 1.0 / 1000.0);
        self.alias("grams", "g");

        self.alias("lbs", "lb");
        self.alias("pounds", "lb");
        self.register("lb", Weight, 1.0 / 2.20462);

        self.register("stone", Weight, 1.0 / 0.157473);
    }

    fn register_angle_units(&mut self) {
        use UnitClass::Angle;

        self.register("deg", Angle, 1.0);
        self.alias("degrees", "deg");

        self.register("rad", Angle, 180.0 / PI);
        self.alias("radians", "rad");
    }

    fn register_time_units(&mut self) {
        use UnitClass::Time;

        let second = 1.0;
        let minute = second * 60.0;
        let hour = minute * 60.0;
        let day = hour * 24.0;

        self.register("sec", Time, second);
        self.alias("second", "sec");
        self.alias("seconds", "sec");

        self.register("min", Time, minute);
        self.alias("minute", "min");
        self.alias("minutes", "min");

        self.register("hr", Time, hour);
        self.alias("hour", "hr");
        self.alias("hours", "hr");

        self.register("day", Time, day);
        self.alias("days", "day");

        // Mean tropical year
        self.register("yr", Time, day * 365.242);
        self.alias("year", "yr");
        self.alias("years", "yr");
    }

    fn register_time_rate_units(&mut self) {
        self.register("hours_per_week", UnitClass::TimeRate, 1.0);
    }
}

/// Returns the class of `unit`, or `None` for a missing or empty unit
pub fn class_of(unit: Option<&str>) -> Result<Option<UnitClass>> {
    match unit {
        None | Some("") => Ok(None),
        Some(name) => UNITS.lookup(name).map(|def| Some(def.class)),
    }
}

/// All registered names in `class`
pub fn units_in_class(class: UnitClass) -> Vec<&'static str> {
    UNITS.by_class(class)
}

/// Raw factor from `unit` to its class reference unit.
///
/// Prefer [`factor`](crate::factor) or [`convert`](crate::convert).
pub fn raw_scale(unit: &str) -> Result<f64> {
    UNITS.lookup(unit).map(|def| def.scale)
}

pub fn all_unit_names() -> Vec<&'static str> {
    UNITS.names().to_vec()
}

pub fn all_unit_classes() -> Vec<UnitClass> {
    UNITS.classes()
}

pub fn lengths() -> Vec<&'static str> {
    units_in_class(UnitClass::Length)
}

pub fn weights() -> Vec<&'static str> {
    units_in_class(UnitClass::Weight)
}

pub fn angles() -> Vec<&'static str> {
    units_in_class(UnitClass::Angle)
}

pub fn times() -> Vec<&'static str> {
    units_in_class(UnitClass::Time)
}

pub fn time_rates() -> Vec<&'static str> {
    units_in_class(UnitClass::TimeRate)
}
