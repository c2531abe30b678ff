//! Shared application service layer for rodheat.
//!
//! This crate provides a unified interface for CLI and GUI frontends,
//! centralizing scenario handling, run execution (inline or on a worker
//! thread), and result querying.

pub mod error;
pub mod progress;
pub mod query;
pub mod run_service;
pub mod scenario_service;
pub mod worker;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use progress::{IntegrationProgress, RunProgressEvent, RunStage};
pub use query::{
    GridAxes, GridSummary, grid_summary, grid_to_csv, node_series, profile_at, series_to_csv,
};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunSource, RunTimingSummary, run, run_profile,
    run_with_progress,
};
pub use scenario_service::{
    ScenarioSummary, describe_scenario, load_scenario, save_scenario, validate_scenario,
};
pub use worker::{RunWorker, WorkerMessage};
