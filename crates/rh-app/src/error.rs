//! Error types for the rh-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and provides a unified error interface for CLI and GUI front ends.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to load scenario {path}: {source}")]
    ScenarioLoad {
        path: PathBuf,
        source: rh_project::ProjectError,
    },

    #[error("Scenario error: {0}")]
    Scenario(#[from] rh_project::ProjectError),

    #[error("Scenario validation failed: {0}")]
    Validation(#[from] rh_project::ValidationError),

    #[error("Simulation error: {0}")]
    Simulation(#[from] rh_sim::SimError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Worker error: {message}")]
    Worker { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Underlying integrator error, if this failure came from `rh-sim`.
    pub fn sim_error(&self) -> Option<&rh_sim::SimError> {
        match self {
            AppError::Simulation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for rh-app operations.
pub type AppResult<T> = Result<T, AppError>;
