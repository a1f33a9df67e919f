//! JSON views of probe and grid results.
//!
//! These are the machine-readable shapes the CLI prints with `--json`.
//! Undefined values (a query on a charge) are emitted as `null`.

use charge_field_core::{arrow, ArrowMode, Coincident, Probe, SampleGrid, Snapshot};
use glam::DVec2;
use serde_json::{json, Value};

use crate::coincident_id;

fn vec_json(v: DVec2) -> Value {
    json!([v.x, v.y])
}

/// Probe result at `point`. A coincidence names the charge id it hit, or
/// `null` when `snapshot` holds no charge at that index.
pub fn probe_json(point: DVec2, result: &Result<Probe, Coincident>, snapshot: &Snapshot) -> Value {
    match result {
        Ok(probe) => json!({
            "x": point.x,
            "y": point.y,
            "field": vec_json(probe.field),
            "magnitude": probe.magnitude,
            "potential": probe.potential,
            "coincident": Value::Null,
        }),
        Err(c) => json!({
            "x": point.x,
            "y": point.y,
            "field": Value::Null,
            "magnitude": Value::Null,
            "potential": Value::Null,
            "coincident": coincident_id(snapshot, *c).map(|id| id.raw()),
        }),
    }
}

/// Every grid cell with its field, potential and drawing arrow.
///
/// Arrows in [`ArrowMode::Magnitude`] are scaled against the grid's largest
/// defined magnitude.
pub fn grid_json(grid: &SampleGrid, mode: ArrowMode, arrow_length: f64) -> Value {
    let reference = grid.max_magnitude();
    let cells: Vec<Value> = grid
        .iter()
        .map(|(col, row, s)| {
            json!({
                "col": col,
                "row": row,
                "x": s.point.x,
                "y": s.point.y,
                "field": s.field.map(vec_json),
                "potential": s.potential,
                "arrow": s.field.map(|f| vec_json(arrow(f, mode, arrow_length, reference))),
            })
        })
        .collect();
    json!({
        "columns": grid.columns(),
        "rows": grid.rows(),
        "spacing": grid.spec().spacing,
        "mode": mode,
        "max_magnitude": reference,
        "cells": cells,
    })
}
