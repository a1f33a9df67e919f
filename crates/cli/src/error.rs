//! CLI failures and the exit codes they map to.
//!
//! - 0:  success, including a probe that lands exactly on a charge
//! - 2:  clap argument error (raised before `run`)
//! - 10: field error (bad evaluator settings, unknown preset, missing charge, grid too large)
//! - 11: scene file could not be read
//! - 12: input rejected by the CLI (unknown arrow mode, non-positive arrow length, stacked charges in `force`)
//! - 13: JSON output could not be produced

use charge_field_core::{ChargeId, FieldError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Field(FieldError),

    #[error("{0}")]
    Io(String),

    /// Arguments clap accepted but the scene cannot act on.
    #[error("{0}")]
    Input(String),

    #[error("JSON output failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    /// Two charges share a position, so the force on `id` has no value.
    pub fn stacked(id: ChargeId, other: ChargeId) -> Self {
        CliError::Input(format!(
            "charge {id} shares its position with charge {other}; force is undefined"
        ))
    }

    /// Arrow length must be a positive finite number of pixels.
    pub fn arrow_length(length: f64) -> Self {
        CliError::Input(format!(
            "arrow length must be positive and finite, got {length}"
        ))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl From<FieldError> for CliError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::Io(msg) => CliError::Io(msg),
            FieldError::UnknownArrowMode(_) => CliError::Input(e.to_string()),
            other => CliError::Field(other),
        }
    }
}
