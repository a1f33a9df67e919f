//! JSON scene descriptions.
//!
//! A scene file describes the canvas, the evaluator settings and the initial
//! charges:
//!
//! ```json
//! {
//!   "width": 800, "height": 600,
//!   "conversion": 200, "coulomb": 8.99e9, "convention": "outward",
//!   "charges": [{ "x": 100, "y": 300, "charge": 1e-9 }]
//! }
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use charge_field_core::error::FieldError;
use charge_field_core::evaluator::{DEFAULT_CONVERSION, DEFAULT_COULOMB};
use charge_field_core::{Charge, ChargeSet, Evaluator, SignConvention};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Scene;

/// Canvas width when a scene file omits it.
pub const DEFAULT_WIDTH: f64 = 800.0;
/// Canvas height when a scene file omits it.
pub const DEFAULT_HEIGHT: f64 = 600.0;

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

fn default_conversion() -> f64 {
    DEFAULT_CONVERSION
}

fn default_coulomb() -> f64 {
    DEFAULT_COULOMB
}

/// One charge entry in a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChargeSpec {
    pub x: f64,
    pub y: f64,
    pub charge: f64,
}

impl From<ChargeSpec> for Charge {
    fn from(spec: ChargeSpec) -> Self {
        Charge::new(spec.x, spec.y, spec.charge)
    }
}

/// Deserialized form of a scene description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneFile {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_conversion")]
    pub conversion: f64,
    #[serde(default = "default_coulomb")]
    pub coulomb: f64,
    #[serde(default)]
    pub convention: SignConvention,
    #[serde(default)]
    pub charges: Vec<ChargeSpec>,
}

impl SceneFile {
    /// Parses a scene description from a JSON string.
    ///
    /// Returns `FieldError::InvalidScene` on malformed JSON or unknown keys.
    pub fn from_json_str(text: &str) -> Result<Self, FieldError> {
        serde_json::from_str(text).map_err(|e| FieldError::InvalidScene(e.to_string()))
    }

    /// Reads and parses a scene description file.
    ///
    /// Returns `FieldError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, FieldError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| FieldError::Io(format!("{}: {e}", path.display())))?;
        log::info!("loaded scene description from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Validates the settings and builds a live scene.
    pub fn into_scene(self) -> Result<Scene, FieldError> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(FieldError::InvalidScene(format!(
                    "{name} must be finite and greater than zero, got {value}"
                )));
            }
        }
        if let Some(bad) = self
            .charges
            .iter()
            .find(|c| !(c.x.is_finite() && c.y.is_finite() && c.charge.is_finite()))
        {
            return Err(FieldError::InvalidScene(format!(
                "charge entry has non-finite values: {bad:?}"
            )));
        }
        let evaluator = Evaluator::new(self.conversion)?
            .with_coulomb(self.coulomb)?
            .with_convention(self.convention);
        let charges = ChargeSet::from_charges(self.charges.into_iter().map(Charge::from));
        Ok(Scene::new(self.width, self.height, evaluator, charges))
    }
}
