//! FTCS step kernels.
//!
//! A kernel derives row `k` from row `k - 1`. Reads come only from `prev` and
//! writes only go to `next`, so no node ever sees a neighbour value from the
//! step being computed.

use rayon::prelude::*;

/// One explicit time step of the 1D heat equation.
pub trait StepKernel {
    /// Fill `next` from `prev` with stability ratio `r`.
    ///
    /// Both slices have the same length (>= 3). Boundary nodes are copied,
    /// interior nodes use the three-point stencil.
    fn step(&self, prev: &[f64], next: &mut [f64], r: f64);
}

#[inline(always)]
fn stencil(left: f64, center: f64, right: f64, r: f64) -> f64 {
    center + r * (left - 2.0 * center + right)
}

#[inline]
fn copy_boundaries(prev: &[f64], next: &mut [f64]) {
    let last = prev.len() - 1;
    next[0] = prev[0];
    next[last] = prev[last];
}

/// Single-threaded kernel.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialKernel;

impl StepKernel for SerialKernel {
    fn step(&self, prev: &[f64], next: &mut [f64], r: f64) {
        debug_assert_eq!(prev.len(), next.len());
        copy_boundaries(prev, next);
        for (i, w) in prev.windows(3).enumerate() {
            next[i + 1] = stencil(w[0], w[1], w[2], r);
        }
    }
}

/// Rayon kernel: interior nodes split into chunks computed on the pool.
#[derive(Clone, Copy, Debug)]
pub struct ParallelKernel {
    /// Interior nodes per task.
    pub chunk_len: usize,
}

impl Default for ParallelKernel {
    fn default() -> Self {
        Self { chunk_len: 1024 }
    }
}

impl StepKernel for ParallelKernel {
    fn step(&self, prev: &[f64], next: &mut [f64], r: f64) {
        debug_assert_eq!(prev.len(), next.len());
        copy_boundaries(prev, next);
        let last = prev.len() - 1;
        let chunk_len = self.chunk_len.max(1);

        next[1..last]
            .par_chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(c, out)| {
                // first interior index handled by this chunk
                let start = 1 + c * chunk_len;
                for (j, slot) in out.iter_mut().enumerate() {
                    let i = start + j;
                    *slot = stencil(prev[i - 1], prev[i], prev[i + 1], r);
                }
            });
    }
}

/// Kernel selection for a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KernelType {
    /// Single thread (default).
    #[default]
    Serial,
    /// Interior nodes of each step spread over the rayon pool.
    Parallel,
}

impl KernelType {
    pub fn label(&self) -> &'static str {
        match self {
            KernelType::Serial => "serial",
            KernelType::Parallel => "parallel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_step_matches_hand_computation() {
        let prev = [100.0, 0.0, 0.0, 0.0, 0.0];
        let mut next = [0.0; 5];
        SerialKernel.step(&prev, &mut next, 0.05);
        assert_eq!(next, [100.0, 5.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn boundaries_are_copied_not_zeroed() {
        let prev = [7.0, 1.0, -3.0];
        let mut next = [f64::NAN; 3];
        SerialKernel.step(&prev, &mut next, 0.25);
        assert_eq!(next[0], 7.0);
        assert_eq!(next[2], -3.0);
        assert_eq!(next[1], 1.0 + 0.25 * (7.0 - 2.0 + -3.0));
    }

    #[test]
    fn parallel_is_bit_identical_to_serial() {
        let prev: Vec<f64> = (0..5003).map(|i| ((i * 37) % 101) as f64 * 0.731).collect();
        let mut serial = vec![0.0; prev.len()];
        let mut parallel = vec![0.0; prev.len()];
        SerialKernel.step(&prev, &mut serial, 0.37);
        ParallelKernel { chunk_len: 64 }.step(&prev, &mut parallel, 0.37);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn parallel_handles_minimal_rod() {
        let prev = [1.0, 0.0, 1.0];
        let mut next = [0.0; 3];
        ParallelKernel::default().step(&prev, &mut next, 0.5);
        assert_eq!(next, [1.0, 1.0, 1.0]);
    }
}
