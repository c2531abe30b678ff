//! Time-by-space result grid.

/// Temperature snapshots of one run, one row per time step.
///
/// Row 0 is the initial profile; row `k` is the state after `k` steps.
/// Stored row-major in a single buffer. Only the integrator constructs
/// grids, so every grid upholds the shape and boundary invariants.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationGrid {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl SimulationGrid {
    pub(crate) fn from_raw(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { data, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Snapshot after `k` steps.
    ///
    /// Panics if `k >= rows()`.
    pub fn row(&self, k: usize) -> &[f64] {
        let start = k * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn get(&self, k: usize, i: usize) -> Option<f64> {
        if k < self.rows && i < self.cols {
            Some(self.data[k * self.cols + i])
        } else {
            None
        }
    }

    pub fn first_row(&self) -> &[f64] {
        self.row(0)
    }

    pub fn last_row(&self) -> &[f64] {
        self.row(self.rows - 1)
    }

    pub fn iter_rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.cols)
    }

    /// Temperature history of node `i`, one value per row.
    pub fn column(&self, i: usize) -> Option<Vec<f64>> {
        if i >= self.cols {
            return None;
        }
        Some(self.iter_rows().map(|row| row[i]).collect())
    }

    /// Raw row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Minimum and maximum over the whole grid.
    pub fn value_range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    pub fn into_rows(self) -> Vec<Vec<f64>> {
        self.data
            .chunks_exact(self.cols)
            .map(<[f64]>::to_vec)
            .collect()
    }
}
