//! Errors raised by registry lookups and conversions
//!
//! Nothing in this crate recovers from these; every error is returned to
//! the immediate caller. A missing or empty unit is never an error.

use thiserror::Error;
use crate::UnitClass;

/// Machine-readable error codes
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const INCOMPATIBLE_UNITS: &str = "INCOMPATIBLE_UNITS";
    pub const CLASS_MISMATCH: &str = "CLASS_MISMATCH";
    pub const UNKNOWN_SYSTEM: &str = "UNKNOWN_SYSTEM";
    pub const UNKNOWN_CLASS: &str = "UNKNOWN_CLASS";
    pub const MISSING_DEFAULT: &str = "MISSING_DEFAULT";
    pub const INVALID_PRECISION: &str = "INVALID_PRECISION";
}

/// Result type for ounce operations
pub type Result<T> = std::result::Result<T, UnitError>;

/// Errors that can occur during unit lookup and conversion
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// Non-empty unit name that is not registered
    #[error("Unknown unit: {0:?}")]
    UnknownUnit(String),

    /// Units belong to different classes
    #[error("Can't convert between apples and oranges ({from} and {to})")]
    IncompatibleUnits { from: String, to: String },

    /// Source unit is not of the class the caller required
    #[error("Units class must be {required}, but got {actual}")]
    ClassMismatch { required: UnitClass, actual: UnitClass },

    #[error("Unknown unit system: {0:?} (expected metric or united_states)")]
    UnknownSystem(String),

    #[error("Unknown units class: {0:?}")]
    UnknownClass(String),

    /// Defaults map has no entry for the resolved class
    #[error("No default unit for class {0}")]
    MissingDefault(UnitClass),

    /// Rounding to this many decimal places overflows an `f64`
    #[error("Precision {0} is out of range for rounding")]
    InvalidPrecision(u32),
}

impl UnitError {
    /// Stable code for this error, suitable for structured output
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            UnitError::IncompatibleUnits { .. } => codes::INCOMPATIBLE_UNITS,
            UnitError::ClassMismatch { .. } => codes::CLASS_MISMATCH,
            UnitError::UnknownSystem(_) => codes::UNKNOWN_SYSTEM,
            UnitError::UnknownClass(_) => codes::UNKNOWN_CLASS,
            UnitError::MissingDefault(_) => codes::MISSING_DEFAULT,
            UnitError::InvalidPrecision(_) => codes::INVALID_PRECISION,
        }
    }
}
