//! Reference profiles and grid diagnostics.

/// Linear steady-state profile between fixed boundary temperatures.
///
/// This is the limit every stable run with Dirichlet boundaries approaches.
pub fn steady_state_profile(left: f64, right: f64, nodes: usize) -> Vec<f64> {
    match nodes {
        0 => Vec::new(),
        1 => vec![left],
        _ => {
            let span = (nodes - 1) as f64;
            (0..nodes)
                .map(|i| left + (right - left) * i as f64 / span)
                .collect()
        }
    }
}

/// Sum of absolute differences between neighbouring nodes.
pub fn total_variation(row: &[f64]) -> f64 {
    row.windows(2).map(|w| (w[1] - w[0]).abs()).sum()
}

/// Largest element-wise deviation between two profiles of equal length.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
