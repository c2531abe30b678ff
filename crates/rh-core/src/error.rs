use thiserror::Error;

pub type RhResult<T> = Result<T, RhError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RhError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Non-positive value for {what}: {value} (must be > 0)")]
    NonPositive { what: &'static str, value: f64 },
}

impl RhError {
    /// Name of the offending quantity.
    pub fn what(&self) -> &'static str {
        match self {
            RhError::NonFinite { what, .. } | RhError::NonPositive { what, .. } => *what,
        }
    }
}
