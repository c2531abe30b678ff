//! Error types for integration runs.

use rh_core::RhError;
use thiserror::Error;

/// Errors reported by the diffusion integrator.
///
/// Both variants are raised during validation, before any row is computed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error(
        "Unstable scheme: stability ratio r = diffusivity * dt / dx^2 = {ratio:.6} exceeds bound {bound} \
         (reduce dt, increase dx or reduce diffusivity)"
    )]
    UnstableScheme { ratio: f64, bound: f64 },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

impl From<RhError> for SimError {
    fn from(e: RhError) -> Self {
        let field = e.what();
        let reason = match e {
            RhError::NonFinite { value, .. } => format!("must be finite (got {value})"),
            RhError::NonPositive { value, .. } => format!("must be > 0 (got {value})"),
        };
        SimError::InvalidParameter { field, reason }
    }
}
