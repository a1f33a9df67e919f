//! Point charges and their stable identifiers.

use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A point source of electric field.
///
/// `position` is in display units (pixels); `charge` is in coulombs and may be
/// zero, in which case the charge acts as a passive sensor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    pub position: DVec2,
    pub charge: f64,
}

impl Charge {
    pub fn new(x: f64, y: f64, charge: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            charge,
        }
    }

    /// A zero-magnitude charge used only to mark a probe location.
    pub fn sensor(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    /// True if this charge contributes nothing to field or potential.
    pub fn is_sensor(&self) -> bool {
        self.charge == 0.0
    }
}

/// Stable identifier handed out by a [`ChargeSet`](crate::ChargeSet).
///
/// Ids are never reused within one set, so UI side tables keyed by id stay
/// valid across removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChargeId(u64);

impl ChargeId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChargeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
