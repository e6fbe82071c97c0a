//! Ounce - Unit Conversion
//!
//! Converts plain numbers between units of the same class, resolves the
//! default unit of a class for a regional unit system, and produces rounded
//! metric/US summaries.
//!
//! Classes:
//! - Length (m, mm, cm, in, ft, fathoms, cubits)
//! - Weight (kg, g, lb, stone)
//! - Angle (deg, rad)
//! - Time (sec, min, hr, day, yr)
//! - Time rate (hours_per_week)
//!
//! A missing or empty unit means "unitless" and passes through every
//! operation unchanged.
//!
//! ```
//! let inches = ounce::convert(Some(25.4), Some("mm"), Some("in"), None).unwrap();
//! assert_eq!(inches.unit.as_deref(), Some("in"));
//!
//! let pretty = ounce::prettify(182.13992, Some("cm"), None).unwrap();
//! assert_eq!(pretty.to_string(), "182 cm (71.75 in)");
//! ```

mod class;
mod error;
mod unit;
mod registry;
mod system;
mod measurement;
mod convert;
mod pretty;

pub use class::UnitClass;
pub use error::{codes, Result, UnitError};
pub use unit::UnitDefinition;
pub use registry::{
    all_unit_classes, all_unit_names, angles, class_of, lengths, raw_scale, time_rates, times,
    units_in_class, weights, UnitRegistry, UNITS,
};
pub use system::{default_units, DefaultUnits, UnitSystem, DEFAULT_SYSTEM};
pub use measurement::Measurement;
pub use convert::{convert, convert_many, convert_to_default, convert_to_system_default, factor};
pub use pretty::{prettify, round_to, Prettified};
