//! Scenario validation logic.

use rh_core::{RhError, ensure_finite, ensure_positive};

use crate::schema::Scenario;

pub const LATEST_VERSION: u32 = 1;

/// Largest rod a scenario may describe, boundaries included. Even a one-row
/// grid of more nodes would exceed the integrator's default cell limit.
pub const MAX_NODES: usize = rh_sim::DEFAULT_MAX_CELLS;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<RhError> for ValidationError {
    fn from(e: RhError) -> Self {
        match e {
            RhError::NonFinite { what, value } => Self::invalid(what, value, "must be finite"),
            RhError::NonPositive { what, value } => Self::invalid(what, value, "must be > 0"),
        }
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    ensure_positive(scenario.rod.length_m, "rod.length_m")?;
    ensure_positive(scenario.rod.dx_m, "rod.dx_m")?;
    ensure_finite(scenario.rod.left_temp, "rod.left_temp")?;
    ensure_finite(scenario.rod.right_temp, "rod.right_temp")?;
    ensure_finite(scenario.rod.initial_temp, "rod.initial_temp")?;
    ensure_positive(scenario.material.diffusivity_m2_s, "material.diffusivity_m2_s")?;
    ensure_positive(scenario.time.total_s, "time.total_s")?;
    ensure_positive(scenario.time.dt_s, "time.dt_s")?;

    if scenario.interior_node_count() == 0 {
        return Err(ValidationError::invalid(
            "rod.dx_m",
            scenario.rod.dx_m,
            format!(
                "rod of length {} m needs dx small enough for at least one interior node",
                scenario.rod.length_m
            ),
        ));
    }

    scenario.node_count()?;

    if scenario.solver.max_steps == Some(0) {
        return Err(ValidationError::invalid(
            "solver.max_steps",
            0,
            "must be positive",
        ));
    }

    Ok(())
}
