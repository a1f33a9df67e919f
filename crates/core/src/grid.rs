//! Regular lattice of field samples, as evaluated once per redraw.
//!
//! A [`SampleGrid`] stores `columns * rows` samples in row-major order. Each
//! sample keeps its display-space point, the field vector and the potential;
//! both are `None` where the point coincides with a charge.

use crate::charge::Charge;
use crate::error::FieldError;
use crate::evaluator::Evaluator;
use glam::DVec2;
use serde::Serialize;

/// Largest lattice [`SampleGrid::sample`] will allocate.
pub const MAX_CELLS: usize = 1 << 20;

/// Placement of sample points: `origin + (col, row) * spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub origin: DVec2,
    pub columns: usize,
    pub rows: usize,
    pub spacing: f64,
}

impl GridSpec {
    /// Lattice of cell centers covering a `width` by `height` canvas.
    ///
    /// The first sample sits half a cell in from the top-left corner. Returns
    /// `FieldError::InvalidSpacing` for a bad spacing and
    /// `FieldError::InvalidDimensions` if the canvas holds no whole cell,
    /// `FieldError::TooManyCells` if the spacing is too fine for the canvas.
    pub fn covering(width: f64, height: f64, spacing: f64) -> Result<Self, FieldError> {
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(FieldError::InvalidSpacing(spacing));
        }
        if !width.is_finite() || !height.is_finite() {
            return Err(FieldError::InvalidDimensions);
        }
        let spec = Self {
            origin: DVec2::splat(spacing / 2.0),
            columns: (width / spacing).floor().max(0.0) as usize,
            rows: (height / spacing).floor().max(0.0) as usize,
            spacing,
        };
        spec.cell_count()?;
        Ok(spec)
    }

    /// Number of cells, validating dimensions and spacing.
    ///
    /// At most [`MAX_CELLS`]; larger lattices are rejected before anything
    /// is allocated.
    pub fn cell_count(&self) -> Result<usize, FieldError> {
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(FieldError::InvalidSpacing(self.spacing));
        }
        if self.columns == 0 || self.rows == 0 {
            return Err(FieldError::InvalidDimensions);
        }
        let cells = self
            .columns
            .checked_mul(self.rows)
            .ok_or(FieldError::InvalidDimensions)?;
        if cells > MAX_CELLS {
            return Err(FieldError::TooManyCells {
                cells,
                max: MAX_CELLS,
            });
        }
        Ok(cells)
    }

    /// Display-space position of cell `(col, row)`.
    pub fn point(&self, col: usize, row: usize) -> DVec2 {
        self.origin + DVec2::new(col as f64, row as f64) * self.spacing
    }
}

/// One evaluated lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridSample {
    pub point: DVec2,
    /// Net field in N/C, `None` on a charge.
    pub field: Option<DVec2>,
    /// Potential in volts, `None` on a charge.
    pub potential: Option<f64>,
}

/// Field and potential sampled on a [`GridSpec`].
#[derive(Debug, Clone)]
pub struct SampleGrid {
    spec: GridSpec,
    samples: Vec<GridSample>,
}

impl SampleGrid {
    /// Evaluates every cell of `spec` against `charges`.
    pub fn sample(
        evaluator: &Evaluator,
        charges: &[Charge],
        spec: GridSpec,
    ) -> Result<Self, FieldError> {
        let len = spec.cell_count()?;
        let mut samples = Vec::with_capacity(len);
        for row in 0..spec.rows {
            for col in 0..spec.columns {
                let point = spec.point(col, row);
                let sample = match evaluator.probe(point, charges) {
                    Ok(probe) => GridSample {
                        point,
                        field: Some(probe.field),
                        potential: Some(probe.potential),
                    },
                    Err(_) => GridSample {
                        point,
                        field: None,
                        potential: None,
                    },
                };
                samples.push(sample);
            }
        }
        log::debug!(
            "sampled {}x{} grid over {} charges",
            spec.columns,
            spec.rows,
            charges.len()
        );
        Ok(Self { spec, samples })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn columns(&self) -> usize {
        self.spec.columns
    }

    pub fn rows(&self) -> usize {
        self.spec.rows
    }

    /// Read-only access to the row-major samples.
    pub fn samples(&self) -> &[GridSample] {
        &self.samples
    }

    /// Sample at `(col, row)`, or `None` outside the grid.
    pub fn get(&self, col: usize, row: usize) -> Option<&GridSample> {
        if col >= self.spec.columns || row >= self.spec.rows {
            return None;
        }
        self.samples.get(row * self.spec.columns + col)
    }

    /// Largest field magnitude among defined samples, 0 if none are defined.
    pub fn max_magnitude(&self) -> f64 {
        self.samples
            .iter()
            .filter_map(|s| s.field)
            .map(DVec2::length)
            .filter(|m| m.is_finite())
            .fold(0.0, f64::max)
    }

    /// Number of samples with a defined field.
    pub fn defined_count(&self) -> usize {
        self.samples.iter().filter(|s| s.field.is_some()).count()
    }

    /// Iterates over all cells yielding `(col, row, sample)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &GridSample)> + '_ {
        self.samples.iter().enumerate().map(|(i, s)| {
            let col = i % self.spec.columns;
            let row = i / self.spec.columns;
            (col, row, s)
        })
    }
}
