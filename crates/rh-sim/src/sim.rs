//! Integration runner.

use std::time::Instant;

use rh_core::first_non_finite;

use crate::error::{SimError, SimResult};
use crate::grid::SimulationGrid;
use crate::kernel::{KernelType, ParallelKernel, SerialKernel, StepKernel};
use crate::params::{STABILITY_BOUND, SimulationParams};

/// Smallest valid temperature vector: two boundaries and one interior node.
pub const MIN_NODES: usize = 3;

/// Default `rows * cols` allocation limit of a run.
pub const DEFAULT_MAX_CELLS: usize = 200_000_000;

/// Ratios above this fraction of the bound get a warning in the log.
const NEAR_BOUND_FRACTION: f64 = 0.9;

/// Upper limit on progress callbacks per run (the final step is always reported).
const PROGRESS_EVENTS: usize = 100;

/// Options for integration runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Step kernel (default: serial)
    pub kernel: KernelType,
    /// Interior nodes below which the parallel kernel runs serially
    pub parallel_min_nodes: usize,
    /// Interior nodes per rayon task
    pub parallel_chunk_len: usize,
    /// Maximum number of steps (safety limit)
    pub max_steps: usize,
    /// Maximum number of grid cells, rows * cols (allocation limit)
    pub max_cells: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            kernel: KernelType::default(),
            parallel_min_nodes: 4096,
            parallel_chunk_len: 1024,
            max_steps: 10_000_000,
            max_cells: DEFAULT_MAX_CELLS,
        }
    }
}

/// Progress snapshot passed to observers during a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimProgress {
    pub step: usize,
    pub total_steps: usize,
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
}

/// Integrate the 1D heat equation from `initial`.
///
/// Returns one row per time step, row 0 being `initial`. Fails with
/// [`SimError::InvalidParameter`] on bad input and [`SimError::UnstableScheme`]
/// when `diffusivity * dt / dx^2 > 0.5`; nothing is computed in either case.
pub fn simulate(
    initial: &[f64],
    total_time: f64,
    dt: f64,
    dx: f64,
    diffusivity: f64,
) -> SimResult<SimulationGrid> {
    let params = SimulationParams::new(total_time, dt, dx, diffusivity)?;
    simulate_params(initial, params)
}

/// [`simulate`] with pre-built parameters and default options.
pub fn simulate_params(initial: &[f64], params: SimulationParams) -> SimResult<SimulationGrid> {
    simulate_with(initial, params, &SimOptions::default(), None)
}

/// Validated run plan: everything checked before the first row is computed.
struct RunPlan {
    ratio: f64,
    steps: usize,
    cols: usize,
}

fn plan_run(initial: &[f64], params: &SimulationParams, opts: &SimOptions) -> SimResult<RunPlan> {
    if initial.len() < MIN_NODES {
        return Err(SimError::invalid(
            "initial",
            format!(
                "temperature vector needs at least {MIN_NODES} nodes (two boundaries and one interior), got {}",
                initial.len()
            ),
        ));
    }
    if let Some((index, value)) = first_non_finite(initial) {
        return Err(SimError::invalid(
            "initial",
            format!("temperature at node {index} must be finite (got {value})"),
        ));
    }

    let ratio = params.check_stability()?;

    let steps = params.steps();
    if steps > opts.max_steps {
        return Err(SimError::invalid(
            "dt",
            format!(
                "run needs {steps} steps, exceeding the limit of {}",
                opts.max_steps
            ),
        ));
    }

    let cols = initial.len();
    let cells = steps.saturating_add(1).checked_mul(cols);
    match cells {
        Some(cells) if cells <= opts.max_cells => {}
        _ => {
            return Err(SimError::invalid(
                "total_time",
                format!(
                    "grid of {} rows x {cols} columns exceeds the limit of {} cells",
                    steps.saturating_add(1),
                    opts.max_cells
                ),
            ));
        }
    }

    Ok(RunPlan { ratio, steps, cols })
}

/// Full-control entry point: options plus an optional progress observer.
pub fn simulate_with(
    initial: &[f64],
    params: SimulationParams,
    opts: &SimOptions,
    mut progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<SimulationGrid> {
    let plan = plan_run(initial, &params, opts)?;
    let RunPlan { ratio, steps, cols } = plan;
    let rows = steps + 1;

    let interior = cols - 2;
    let kernel = match opts.kernel {
        KernelType::Parallel if interior >= opts.parallel_min_nodes => KernelType::Parallel,
        _ => KernelType::Serial,
    };

    if ratio > NEAR_BOUND_FRACTION * STABILITY_BOUND {
        tracing::warn!(ratio, bound = STABILITY_BOUND, "stability ratio is close to the bound");
    }
    tracing::debug!(
        rows,
        cols,
        ratio,
        kernel = kernel.label(),
        "starting diffusion run"
    );

    let started = Instant::now();
    let mut data = vec![0.0; rows * cols];
    data[..cols].copy_from_slice(initial);

    let report_every = (steps / PROGRESS_EVENTS).max(1);
    let t_end = params.total_time();

    for k in 1..rows {
        let (done, rest) = data.split_at_mut(k * cols);
        let prev = &done[(k - 1) * cols..];
        let next = &mut rest[..cols];

        match kernel {
            KernelType::Serial => SerialKernel.step(prev, next, ratio),
            KernelType::Parallel => ParallelKernel {
                chunk_len: opts.parallel_chunk_len,
            }
            .step(prev, next, ratio),
        }

        if k % report_every == 0 || k == steps {
            if let Some(cb) = progress.as_deref_mut() {
                cb(SimProgress {
                    step: k,
                    total_steps: steps,
                    sim_time_s: k as f64 * params.dt(),
                    t_end_s: t_end,
                    fraction_complete: k as f64 / steps as f64,
                });
            }
        }
    }

    tracing::info!(
        rows,
        cols,
        elapsed_s = started.elapsed().as_secs_f64(),
        "diffusion run complete"
    );

    Ok(SimulationGrid::from_raw(data, rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_options_defaults() {
        let opts = SimOptions::default();
        assert_eq!(opts.kernel, KernelType::Serial);
        assert_eq!(opts.max_steps, 10_000_000);
        assert_eq!(opts.parallel_min_nodes, 4096);
    }

    #[test]
    fn short_vector_is_rejected() {
        let err = simulate(&[1.0, 2.0], 1.0, 0.1, 1.0, 0.1).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { field: "initial", .. }));
    }

    #[test]
    fn non_finite_initial_is_rejected() {
        let err = simulate(&[1.0, f64::NAN, 0.0], 1.0, 0.1, 1.0, 0.1).unwrap_err();
        match err {
            SimError::InvalidParameter { field, reason } => {
                assert_eq!(field, "initial");
                assert!(reason.contains("node 1"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn total_time_shorter_than_dt_yields_initial_row_only() {
        let mut calls = 0usize;
        let params = SimulationParams::new(0.6, 1.0, 1.0, 0.1).unwrap();
        let grid = simulate_with(
            &[1.0, 0.0, 0.0],
            params,
            &SimOptions::default(),
            Some(&mut |_| calls += 1),
        )
        .unwrap();
        assert_eq!(grid.rows(), 1);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.row(0), &[1.0, 0.0, 0.0]);
        assert_eq!(calls, 0);
    }

    #[test]
    fn step_limit_is_enforced() {
        let params = SimulationParams::new(10.0, 0.1, 1.0, 0.1).unwrap();
        let opts = SimOptions {
            max_steps: 50,
            ..SimOptions::default()
        };
        let err = simulate_with(&[1.0, 0.0, 0.0], params, &opts, None).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { field: "dt", .. }));
    }

    #[test]
    fn cell_limit_is_enforced() {
        let params = SimulationParams::new(10.0, 0.1, 1.0, 0.1).unwrap();
        let opts = SimOptions {
            max_cells: 100,
            ..SimOptions::default()
        };
        let err = simulate_with(&[1.0, 0.0, 0.0, 0.0], params, &opts, None).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { field: "total_time", .. }));
    }

    #[test]
    fn unstable_run_computes_nothing() {
        let mut calls = 0usize;
        let params = SimulationParams::new(1.0, 1.0, 0.1, 110.0).unwrap();
        let result = simulate_with(
            &[100.0, 0.0, 0.0],
            params,
            &SimOptions::default(),
            Some(&mut |_| calls += 1),
        );
        assert!(matches!(result, Err(SimError::UnstableScheme { .. })));
        assert_eq!(calls, 0);
    }

    #[test]
    fn progress_ends_at_completion() {
        let params = SimulationParams::new(1000.0, 1.0, 1.0, 0.25).unwrap();
        let mut events = Vec::new();
        simulate_with(
            &[1.0, 0.0, 0.0, 0.0],
            params,
            &SimOptions::default(),
            Some(&mut |p| events.push(p)),
        )
        .unwrap();
        assert!(events.len() <= PROGRESS_EVENTS + 1);
        let last = events.last().unwrap();
        assert_eq!(last.step, 1000);
        assert_eq!(last.fraction_complete, 1.0);
        assert!(events.windows(2).all(|w| w[0].step < w[1].step));
    }
}
