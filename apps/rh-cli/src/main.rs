use clap::{Args, Parser, Subcommand};
use rh_app::{
    AppError, AppResult, GridAxes, RunOptions, RunProgressEvent, RunRequest, RunResponse,
    RunSource, RunStage, RunWorker, query, scenario_service,
};
use rh_project::{MaterialDef, RodDef, Scenario, SolverDef, TimeDef};
use rh_sim::{KernelType, SimError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "rodheat")]
#[command(about = "rodheat CLI - 1D heat conduction along a rod", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and report its stability ratio
    Validate {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Run a scenario file
    Run {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Run an ad hoc rod given on the command line
    Simulate {
        /// Fixed temperature of the left end
        #[arg(long)]
        left: f64,
        /// Fixed temperature of the right end
        #[arg(long)]
        right: f64,
        /// Starting temperature of the interior nodes
        #[arg(long, default_value_t = 0.0)]
        initial: f64,
        /// Rod length in meters
        #[arg(long)]
        length: f64,
        /// Spatial step in meters
        #[arg(long)]
        dx: f64,
        /// Time step in seconds
        #[arg(long)]
        dt: f64,
        /// Simulated duration in seconds
        #[arg(long)]
        time: f64,
        /// Thermal diffusivity in m^2/s
        #[arg(long)]
        diffusivity: f64,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Spread each step's interior nodes across threads
    #[arg(long)]
    parallel: bool,
    /// Write the full grid as CSV
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print the temperature history of this node as CSV
    #[arg(long)]
    series: Option<usize>,
    /// Print the profile at the row nearest this time (seconds)
    #[arg(long)]
    profile_at: Option<f64>,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&scenario_path),
        Commands::Run {
            scenario_path,
            output,
        } => cmd_run(RunSource::ScenarioFile(scenario_path), &output),
        Commands::Simulate {
            left,
            right,
            initial,
            length,
            dx,
            dt,
            time,
            diffusivity,
            output,
        } => {
            let scenario = Scenario {
                version: rh_project::LATEST_VERSION,
                name: "command line rod".to_string(),
                rod: RodDef {
                    length_m: length,
                    dx_m: dx,
                    left_temp: left,
                    right_temp: right,
                    initial_temp: initial,
                },
                material: MaterialDef {
                    diffusivity_m2_s: diffusivity,
                },
                time: TimeDef {
                    total_s: time,
                    dt_s: dt,
                },
                solver: SolverDef::default(),
            };
            cmd_run(RunSource::Scenario(scenario), &output)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            clear_progress_line();
            eprintln!("error: {err}");
            if let Some(hint) = hint_for(&err) {
                eprintln!("hint: {hint}");
            }
            ExitCode::FAILURE
        }
    }
}

fn hint_for(err: &AppError) -> Option<String> {
    match err.sim_error()? {
        SimError::UnstableScheme { ratio, bound } => Some(format!(
            "r = {ratio:.4} must be <= {bound}; shrink dt by a factor of at least {:.1}",
            ratio / bound
        )),
        SimError::InvalidParameter { field, .. } => Some(format!("check the value of `{field}`")),
    }
}

fn cmd_validate(scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = scenario_service::load_scenario(scenario_path)?;
    scenario_service::validate_scenario(&scenario)?;
    let summary = scenario_service::describe_scenario(&scenario);

    println!("✓ Scenario is valid: {}", summary.name);
    println!(
        "  Nodes: {} ({} interior)",
        summary.node_count, summary.interior_node_count
    );
    println!("  Steps: {}", summary.steps);
    println!("  Stability ratio: {:.4}", summary.stability_ratio);
    if summary.stable {
        println!("  ✓ Stable (r <= {})", rh_sim::STABILITY_BOUND);
    } else {
        println!(
            "  ✗ Unstable: a run will be rejected; use dt <= {:.3e} s",
            summary.max_stable_dt_s
        );
    }
    Ok(())
}

fn cmd_run(source: RunSource, output: &OutputArgs) -> AppResult<()> {
    let request = RunRequest {
        source,
        options: RunOptions {
            kernel: output.parallel.then_some(KernelType::Parallel),
            max_steps: None,
        },
    };

    tracing::debug!(parallel = output.parallel, "dispatching run to worker thread");
    let worker = RunWorker::start(request)?;

    let mut last_emit = Instant::now();
    let mut last_fraction = -1.0f64;
    let mut last_stage = None;
    let response = worker.wait_with(|event| {
        let fraction = event
            .integration
            .as_ref()
            .map(|t| t.fraction_complete)
            .unwrap_or(-1.0);
        let emit_now = last_stage != Some(event.stage)
            || (fraction >= 0.0 && (fraction - last_fraction).abs() >= 0.005)
            || last_emit.elapsed().as_millis() >= 100;
        if emit_now {
            render_cli_progress(event);
            if fraction >= 0.0 {
                last_fraction = fraction;
            }
            last_stage = Some(event.stage);
            last_emit = Instant::now();
        }
    })?;
    clear_progress_line();

    println!("✓ Simulation completed: {}", response.name);
    print_summary(&response);
    write_outputs(&response, output)?;
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (event.stage, &event.integration) {
        (RunStage::Integrating, Some(t)) => {
            let width = 28usize;
            let filled = ((t.fraction_complete * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  t={:.3}/{:.3}s  step={}/{}  elapsed={:.1}s",
                bar,
                t.fraction_complete * 100.0,
                t.sim_time_s,
                t.t_end_s,
                t.step,
                t.total_steps,
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_summary(response: &RunResponse) {
    let summary = query::grid_summary(&response.grid, &response.params);
    let timing = &response.timing;

    println!("  Grid: {} rows x {} nodes", summary.rows, summary.cols);
    println!(
        "  Time range: {:.3} - {:.3} s",
        summary.time_range.0, summary.time_range.1
    );
    println!(
        "  Rod extent: {:.4} - {:.4} m",
        response.axes.x_extent.0, response.axes.x_extent.1
    );
    println!("  Stability ratio: {:.4}", response.stability_ratio);
    println!(
        "  Temperature range: {:.3} - {:.3}",
        summary.min_temp, summary.max_temp
    );
    println!(
        "  Max deviation from steady state: {:.4}",
        summary.steady_state_deviation
    );

    let total = timing.total_time_s.max(1.0e-12);
    println!("\nTiming summary:");
    if timing.load_time_s > 0.0 {
        println!("  Load:      {:.3}s", timing.load_time_s);
    }
    println!(
        "  Prepare:   {:.3}s ({:.1}%)",
        timing.prepare_time_s,
        100.0 * timing.prepare_time_s / total
    );
    println!(
        "  Integrate: {:.3}s ({:.1}%)",
        timing.integrate_time_s,
        100.0 * timing.integrate_time_s / total
    );
    println!("  Total:     {:.3}s", timing.total_time_s);
    println!("  Steps:     {}", timing.steps);
    if let Some(kernel) = timing.kernel {
        println!("  Kernel:    {}", kernel.label());
    }
}

fn write_outputs(response: &RunResponse, output: &OutputArgs) -> AppResult<()> {
    let axes: &GridAxes = &response.axes;

    if let Some(time_s) = output.profile_at {
        let (t, profile) = query::profile_at(&response.grid, &response.params, time_s)?;
        println!("\nProfile at t = {:.4} s:", t);
        println!("x_m,value");
        for (x, v) in profile {
            println!("{},{}", x, v);
        }
    }

    if let Some(node) = output.series {
        let series = query::node_series(&response.grid, &response.params, node)?;
        println!("\nNode {} (x = {:.4} m):", node, axes.position_of_node(node));
        print!("{}", query::series_to_csv(&series));
    }

    if let Some(path) = &output.output {
        let csv = query::grid_to_csv(&response.grid, axes);
        std::fs::write(path, csv)?;
        println!(
            "✓ Exported {} x {} grid to {}",
            response.grid.rows(),
            response.grid.cols(),
            path.display()
        );
    }

    Ok(())
}
