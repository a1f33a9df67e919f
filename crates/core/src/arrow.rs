//! Turning field vectors into arrow vectors for drawing.
//!
//! The display mode changes only how long an arrow is drawn, never the
//! physics behind it.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FieldError;

/// How field vectors are rescaled before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowMode {
    /// Every arrow has the full length; only direction is shown.
    #[default]
    Direction,
    /// Length is proportional to field strength, capped at full length.
    Magnitude,
}

impl FromStr for ArrowMode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direction" => Ok(ArrowMode::Direction),
            "magnitude" => Ok(ArrowMode::Magnitude),
            _ => Err(FieldError::UnknownArrowMode(s.to_string())),
        }
    }
}

/// Arrow vector for `field`, at most `length` long.
///
/// In [`ArrowMode::Magnitude`] a field of strength `reference` (typically the
/// grid's [`max_magnitude`](crate::SampleGrid::max_magnitude)) maps to full
/// length. A zero or non-finite field, or a non-positive reference, gives the
/// zero vector.
pub fn arrow(field: DVec2, mode: ArrowMode, length: f64, reference: f64) -> DVec2 {
    let magnitude = field.length();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return DVec2::ZERO;
    }
    let unit = field / magnitude;
    match mode {
        ArrowMode::Direction => unit * length,
        ArrowMode::Magnitude => {
            if reference <= 0.0 || !reference.is_finite() {
                return DVec2::ZERO;
            }
            unit * length * (magnitude / reference).min(1.0)
        }
    }
}
