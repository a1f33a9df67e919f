#![deny(unsafe_code)]
//! Core types for the charge-field electrostatics toolkit.
//!
//! Provides `Charge`/`ChargeId`, the editable `ChargeSet` with immutable
//! `Snapshot`s and a `HandleMap` side table for UI handles, the Coulomb
//! superposition `Evaluator`, lattice sampling via `SampleGrid`, arrow
//! scaling for display, and JSON parameter helpers.

pub mod arrow;
pub mod charge;
pub mod charge_set;
pub mod error;
pub mod evaluator;
pub mod grid;
pub mod params;

pub use arrow::{arrow, ArrowMode};
pub use charge::{Charge, ChargeId};
pub use charge_set::{ChargeSet, HandleMap, Snapshot};
pub use error::FieldError;
pub use evaluator::{distance, Coincident, Evaluator, Probe, SignConvention};
pub use grid::{GridSample, GridSpec, SampleGrid, MAX_CELLS};
