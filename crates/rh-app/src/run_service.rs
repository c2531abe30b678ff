//! Run execution service.

use std::borrow::Cow;
use std::path::PathBuf;
use std::time::Instant;

use rh_project::Scenario;
use rh_sim::{KernelType, SimOptions, SimProgress, SimulationGrid, SimulationParams};

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage};
use crate::query::GridAxes;
use crate::scenario_service;

/// Where the initial profile and parameters come from.
#[derive(Debug, Clone)]
pub enum RunSource {
    /// Scenario file on disk (YAML or JSON).
    ScenarioFile(PathBuf),
    /// Scenario already in memory.
    Scenario(Scenario),
    /// Explicit profile and parameters, bypassing scenario files.
    Profile {
        initial: Vec<f64>,
        params: SimulationParams,
    },
}

/// Overrides applied on top of the source's own solver settings.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub kernel: Option<KernelType>,
    pub max_steps: Option<usize>,
}

/// Request to execute a run. Owned so it can move onto a worker thread.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source: RunSource,
    pub options: RunOptions,
}

impl RunRequest {
    pub fn new(source: RunSource) -> Self {
        Self {
            source,
            options: RunOptions::default(),
        }
    }
}

/// Concise timing and execution summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub load_time_s: f64,
    pub prepare_time_s: f64,
    pub integrate_time_s: f64,
    pub total_time_s: f64,
    pub steps: usize,
    pub kernel: Option<KernelType>,
}

/// Response from a run execution. Owns the finished grid.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub name: String,
    pub grid: SimulationGrid,
    pub params: SimulationParams,
    pub axes: GridAxes,
    pub stability_ratio: f64,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    integration: Option<SimProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            integration: integration.map(Into::into),
        });
    }
}

/// Execute a run.
pub fn run(request: &RunRequest) -> AppResult<RunResponse> {
    run_with_progress(request, None)
}

/// Convenience wrapper for explicit profiles.
pub fn run_profile(
    initial: Vec<f64>,
    params: SimulationParams,
    options: RunOptions,
) -> AppResult<RunResponse> {
    run(&RunRequest {
        source: RunSource::Profile { initial, params },
        options,
    })
}

struct PreparedRun<'a> {
    name: String,
    initial: Cow<'a, [f64]>,
    params: SimulationParams,
    sim_options: SimOptions,
}

fn prepare_scenario<'a>(
    scenario: &Scenario,
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    started: Instant,
) -> AppResult<PreparedRun<'a>> {
    emit_progress(
        progress_cb,
        RunStage::Validating,
        started,
        Some(format!("Validating scenario '{}'", scenario.name)),
        None,
    );
    scenario_service::validate_scenario(scenario)?;

    emit_progress(
        progress_cb,
        RunStage::BuildingInitialProfile,
        started,
        Some(format!(
            "{} interior nodes",
            scenario.interior_node_count()
        )),
        None,
    );

    Ok(PreparedRun {
        name: scenario.name.clone(),
        initial: Cow::Owned(scenario.initial_profile()?),
        params: scenario.params()?,
        sim_options: scenario.sim_options(),
    })
}

/// Execute a run and stream progress events.
///
/// Events arrive in stage order and the grid is returned only once every
/// row has been computed.
pub fn run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    let prepare_started = Instant::now();
    let mut prepared = match &request.source {
        RunSource::ScenarioFile(path) => {
            emit_progress(
                &mut progress_cb,
                RunStage::LoadingScenario,
                started,
                Some(format!("Loading {}", path.display())),
                None,
            );
            let load_started = Instant::now();
            let scenario = scenario_service::load_scenario(path)?;
            timing.load_time_s = load_started.elapsed().as_secs_f64();
            prepare_scenario(&scenario, &mut progress_cb, started)?
        }
        RunSource::Scenario(scenario) => prepare_scenario(scenario, &mut progress_cb, started)?,
        RunSource::Profile { initial, params } => PreparedRun {
            name: "profile".to_string(),
            initial: Cow::Borrowed(initial.as_slice()),
            params: *params,
            sim_options: SimOptions::default(),
        },
    };
    timing.prepare_time_s = prepare_started.elapsed().as_secs_f64();

    if let Some(kernel) = request.options.kernel {
        prepared.sim_options.kernel = kernel;
    }
    if let Some(max_steps) = request.options.max_steps {
        prepared.sim_options.max_steps = max_steps;
    }
    timing.kernel = Some(prepared.sim_options.kernel);

    emit_progress(
        &mut progress_cb,
        RunStage::Integrating,
        started,
        Some(format!("Integrating '{}'", prepared.name)),
        None,
    );

    let integrate_started = Instant::now();
    let grid = {
        let mut forward = |p: SimProgress| {
            emit_progress(&mut progress_cb, RunStage::Integrating, started, None, Some(p));
        };
        rh_sim::simulate_with(
            &prepared.initial,
            prepared.params,
            &prepared.sim_options,
            Some(&mut forward),
        )?
    };
    timing.integrate_time_s = integrate_started.elapsed().as_secs_f64();
    timing.steps = grid.rows() - 1;
    timing.total_time_s = started.elapsed().as_secs_f64();

    tracing::info!(
        name = %prepared.name,
        rows = grid.rows(),
        cols = grid.cols(),
        total_s = timing.total_time_s,
        "run finished"
    );

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    let axes = GridAxes::new(&grid, &prepared.params);
    Ok(RunResponse {
        name: prepared.name,
        stability_ratio: prepared.params.stability_ratio(),
        params: prepared.params,
        axes,
        grid,
        timing,
    })
}
