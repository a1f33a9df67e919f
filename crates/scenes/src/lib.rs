#![deny(unsafe_code)]
//! Headless scenes: a canvas, an evaluator and an editable charge set.
//!
//! This crate sits between `charge-field-core` (charges and the evaluator)
//! and front ends such as the CLI. It owns the named preset registry, JSON
//! scene descriptions and JSON report views, so front ends do not duplicate
//! that logic.

pub mod report;
pub mod scene_file;

use charge_field_core::error::FieldError;
use charge_field_core::{
    Charge, ChargeId, ChargeSet, Coincident, Evaluator, GridSpec, Probe, SampleGrid, Snapshot,
};
use glam::DVec2;
use std::path::Path;

pub use scene_file::{ChargeSpec, SceneFile};

/// All available preset names.
const PRESET_NAMES: &[&str] = &["single", "dipole", "sensor", "quadrupole"];

/// Named starting layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// One positive charge in the middle of the canvas.
    Single,
    /// Equal and opposite charges 600 px apart on the horizontal midline.
    Dipole,
    /// The dipole plus a zero-magnitude sensor above the midpoint.
    Sensor,
    /// Four alternating charges on the corners of a square.
    Quadrupole,
}

impl Preset {
    /// Looks up a preset by name.
    ///
    /// Returns `FieldError::UnknownPreset` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, FieldError> {
        match name {
            "single" => Ok(Preset::Single),
            "dipole" => Ok(Preset::Dipole),
            "sensor" => Ok(Preset::Sensor),
            "quadrupole" => Ok(Preset::Quadrupole),
            _ => Err(FieldError::UnknownPreset(name.to_string())),
        }
    }

    /// Returns a slice of all recognized preset names.
    pub fn list_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    fn conversion(self) -> f64 {
        match self {
            Preset::Single | Preset::Quadrupole => 100.0,
            Preset::Dipole | Preset::Sensor => 200.0,
        }
    }

    fn charges(self) -> Vec<Charge> {
        const Q: f64 = 1e-9;
        match self {
            Preset::Single => vec![Charge::new(400.0, 300.0, Q)],
            Preset::Dipole => vec![Charge::new(100.0, 300.0, Q), Charge::new(700.0, 300.0, -Q)],
            Preset::Sensor => vec![
                Charge::new(100.0, 300.0, Q),
                Charge::new(700.0, 300.0, -Q),
                Charge::sensor(400.0, 150.0),
            ],
            Preset::Quadrupole => vec![
                Charge::new(300.0, 200.0, Q),
                Charge::new(500.0, 200.0, -Q),
                Charge::new(300.0, 400.0, -Q),
                Charge::new(500.0, 400.0, Q),
            ],
        }
    }

    /// Builds a fresh 800x600 scene for this preset.
    pub fn build(self) -> Result<Scene, FieldError> {
        let evaluator = Evaluator::new(self.conversion())?;
        Ok(Scene::new(
            scene_file::DEFAULT_WIDTH,
            scene_file::DEFAULT_HEIGHT,
            evaluator,
            ChargeSet::from_charges(self.charges()),
        ))
    }
}

/// A canvas with its evaluator settings and live charge set.
///
/// Queries always run against a fresh [`Snapshot`] of the charges.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    evaluator: Evaluator,
    charges: ChargeSet,
}

impl Scene {
    pub fn new(width: f64, height: f64, evaluator: Evaluator, charges: ChargeSet) -> Self {
        Self {
            width,
            height,
            evaluator,
            charges,
        }
    }

    /// Builds the named preset scene.
    pub fn from_preset(name: &str) -> Result<Self, FieldError> {
        let scene = Preset::from_name(name)?.build()?;
        log::debug!("built preset {name} with {} charges", scene.charges.len());
        Ok(scene)
    }

    /// Returns a slice of all recognized preset names.
    pub fn list_presets() -> &'static [&'static str] {
        Preset::list_names()
    }

    /// Parses and validates a JSON scene description.
    pub fn from_json_str(text: &str) -> Result<Self, FieldError> {
        SceneFile::from_json_str(text)?.into_scene()
    }

    /// Reads a JSON scene description from disk.
    pub fn load(path: &Path) -> Result<Self, FieldError> {
        SceneFile::load(path)?.into_scene()
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn charges(&self) -> &ChargeSet {
        &self.charges
    }

    /// Mutable access for add/remove/drag edits.
    pub fn charges_mut(&mut self) -> &mut ChargeSet {
        &mut self.charges
    }

    pub fn snapshot(&self) -> Snapshot {
        self.charges.snapshot()
    }

    /// Field, magnitude and potential at a display-space point.
    pub fn probe(&self, point: DVec2) -> Result<Probe, Coincident> {
        self.evaluator.probe(point, self.snapshot().charges())
    }

    /// Samples the whole canvas at the given cell spacing.
    pub fn grid(&self, spacing: f64) -> Result<SampleGrid, FieldError> {
        let spec = GridSpec::covering(self.width, self.height, spacing)?;
        SampleGrid::sample(&self.evaluator, self.snapshot().charges(), spec)
    }

    /// Distance between two display-space points in meters.
    pub fn measure(&self, a: DVec2, b: DVec2) -> f64 {
        self.evaluator.measure(a, b)
    }

    /// Force in newtons on charge `id` from all other charges.
    ///
    /// The inner `Err` carries the id of a charge stacked on the same spot.
    pub fn force_on(&self, id: ChargeId) -> Result<Result<DVec2, ChargeId>, FieldError> {
        let snapshot = self.snapshot();
        let index = snapshot
            .index_of(id)
            .ok_or(FieldError::ChargeNotFound(id))?;
        match self.evaluator.force_on(index, snapshot.charges())? {
            Ok(force) => Ok(Ok(force)),
            Err(c) => coincident_id(&snapshot, c)
                .map(Err)
                .ok_or(FieldError::ChargeIndexOutOfRange {
                    index: c.index,
                    len: snapshot.len(),
                }),
        }
    }
}

/// Maps a coincidence back to the id of the charge it names.
///
/// `None` if the coincidence came from a different charge slice than
/// `snapshot`.
pub fn coincident_id(snapshot: &Snapshot, coincident: Coincident) -> Option<ChargeId> {
    snapshot.id_at(coincident.index)
}
