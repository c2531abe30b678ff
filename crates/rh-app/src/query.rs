//! Query helpers for extracting data from finished grids.

use rh_sim::{SimulationGrid, SimulationParams, max_abs_diff, steady_state_profile};

use crate::error::{AppError, AppResult};

/// Plot extents of a grid rendered as a time-by-space image.
///
/// The horizontal axis spans `[0, cols * dx]`, the vertical axis
/// `[0, total_time]` with row 0 at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridAxes {
    pub x_extent: (f64, f64),
    pub t_extent: (f64, f64),
    pub dx: f64,
    pub dt: f64,
    pub rows: usize,
    pub cols: usize,
}

impl GridAxes {
    pub fn new(grid: &SimulationGrid, params: &SimulationParams) -> Self {
        Self {
            x_extent: (0.0, grid.cols() as f64 * params.dx()),
            t_extent: (0.0, params.total_time()),
            dx: params.dx(),
            dt: params.dt(),
            rows: grid.rows(),
            cols: grid.cols(),
        }
    }

    /// Simulated time of row `k`.
    pub fn time_of_row(&self, k: usize) -> f64 {
        k as f64 * self.dt
    }

    /// Position of node `i` along the rod.
    pub fn position_of_node(&self, i: usize) -> f64 {
        i as f64 * self.dx
    }

    /// Row closest to `time_s`, clamped to the grid.
    pub fn row_at(&self, time_s: f64) -> usize {
        let k = (time_s / self.dt).round();
        if k <= 0.0 {
            0
        } else {
            (k as usize).min(self.rows - 1)
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct GridSummary {
    pub rows: usize,
    pub cols: usize,
    pub time_range: (f64, f64),
    pub min_temp: f64,
    pub max_temp: f64,
    /// Max deviation of the last row from the linear steady state.
    pub steady_state_deviation: f64,
}

pub fn grid_summary(grid: &SimulationGrid, params: &SimulationParams) -> GridSummary {
    let axes = GridAxes::new(grid, params);
    let (min_temp, max_temp) = grid.value_range();
    let last = grid.last_row();
    let steady = steady_state_profile(last[0], last[last.len() - 1], last.len());

    GridSummary {
        rows: grid.rows(),
        cols: grid.cols(),
        time_range: (0.0, axes.time_of_row(grid.rows() - 1)),
        min_temp,
        max_temp,
        steady_state_deviation: max_abs_diff(last, &steady),
    }
}

/// Temperature history `(time_s, temp)` of one node.
pub fn node_series(
    grid: &SimulationGrid,
    params: &SimulationParams,
    node: usize,
) -> AppResult<Vec<(f64, f64)>> {
    let axes = GridAxes::new(grid, params);
    let column = grid.column(node).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Node {node} out of range (rod has {} nodes)",
            grid.cols()
        ))
    })?;
    Ok(column
        .into_iter()
        .enumerate()
        .map(|(k, t)| (axes.time_of_row(k), t))
        .collect())
}

/// Spatial profile `(x_m, temp)` at the row nearest `time_s`.
///
/// Returns the actual time of the selected row alongside the profile.
pub fn profile_at(
    grid: &SimulationGrid,
    params: &SimulationParams,
    time_s: f64,
) -> AppResult<(f64, Vec<(f64, f64)>)> {
    if !time_s.is_finite() || time_s < 0.0 {
        return Err(AppError::InvalidInput(format!(
            "Profile time must be finite and >= 0 (got {time_s})"
        )));
    }
    let axes = GridAxes::new(grid, params);
    let k = axes.row_at(time_s);
    let profile = grid
        .row(k)
        .iter()
        .enumerate()
        .map(|(i, &t)| (axes.position_of_node(i), t))
        .collect();
    Ok((axes.time_of_row(k), profile))
}

/// Whole grid as CSV: a header of node positions, then one line per row.
pub fn grid_to_csv(grid: &SimulationGrid, axes: &GridAxes) -> String {
    let mut csv = String::from("time_s");
    for i in 0..grid.cols() {
        csv.push_str(&format!(",x_{}", axes.position_of_node(i)));
    }
    csv.push('\n');
    for (k, row) in grid.iter_rows().enumerate() {
        csv.push_str(&axes.time_of_row(k).to_string());
        for v in row {
            csv.push(',');
            csv.push_str(&v.to_string());
        }
        csv.push('\n');
    }
    csv
}

/// Two-column CSV for a node series.
pub fn series_to_csv(series: &[(f64, f64)]) -> String {
    let mut csv = String::from("time_s,value\n");
    for (t, val) in series {
        csv.push_str(&format!("{},{}\n", t, val));
    }
    csv
}
