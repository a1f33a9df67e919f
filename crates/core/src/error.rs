//! Error types for the charge-field core.
//!
//! Coincidence of a query point with a charge is not an error and lives in
//! [`crate::evaluator::Coincident`]; everything here is a genuine misuse or
//! bad input.

use crate::charge::ChargeId;
use thiserror::Error;

/// Errors produced by charge-set and evaluator operations.
#[derive(Debug, Error)]
pub enum FieldError {
    /// The pixels-per-meter conversion was zero, negative, or not finite.
    #[error("invalid conversion factor {0}: must be finite and greater than zero")]
    InvalidConversion(f64),

    /// The Coulomb constant was not a finite number.
    #[error("invalid Coulomb constant {0}: must be finite")]
    InvalidCoulombConstant(f64),

    /// A sample grid had zero columns or rows, or its cell count overflowed.
    #[error("invalid dimensions: columns and rows must be non-zero")]
    InvalidDimensions,

    /// A sample grid spacing was zero, negative, or not finite.
    #[error("invalid grid spacing {0}: must be finite and greater than zero")]
    InvalidSpacing(f64),

    /// A sample grid would hold more cells than [`crate::MAX_CELLS`].
    #[error("grid of {cells} cells exceeds the limit of {max}")]
    TooManyCells { cells: usize, max: usize },

    /// No charge with this id exists in the set.
    #[error("charge not found: {0}")]
    ChargeNotFound(ChargeId),

    /// A snapshot index was past the end of the charge list.
    #[error("charge index {index} out of range for {len} charges")]
    ChargeIndexOutOfRange { index: usize, len: usize },

    /// A sign convention name was not recognized.
    #[error("unknown sign convention: {0}")]
    UnknownConvention(String),

    /// An arrow display mode name was not recognized.
    #[error("unknown arrow mode: {0}")]
    UnknownArrowMode(String),

    /// A preset name was not recognized.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A scene description could not be parsed or validated.
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// Reading a scene description failed.
    #[error("I/O error: {0}")]
    Io(String),
}
