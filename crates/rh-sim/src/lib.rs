//! Explicit finite-difference integrator for the 1D heat equation.
//!
//! Provides:
//! - immutable run parameters with the FTCS stability check
//! - serial and rayon step kernels sharing one stencil
//! - the `simulate` entry point producing a time-by-space grid
//! - steady-state and variation helpers for checking results

pub mod analysis;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod params;
pub mod sim;

pub use analysis::{max_abs_diff, steady_state_profile, total_variation};
pub use error::{SimError, SimResult};
pub use grid::SimulationGrid;
pub use kernel::{KernelType, ParallelKernel, SerialKernel, StepKernel};
pub use params::{
    STABILITY_BOUND, SimulationParams, max_stable_dt, stability_ratio, step_count,
};
pub use sim::{
    DEFAULT_MAX_CELLS, MIN_NODES, SimOptions, SimProgress, simulate, simulate_params, simulate_with,
};
