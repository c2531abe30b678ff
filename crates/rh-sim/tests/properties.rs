//! Grid invariants over randomly generated stable runs.

use proptest::prelude::*;
use rh_sim::{SimError, simulate, total_variation};

fn profile() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-500.0_f64..500.0_f64, 3..40)
}

proptest! {
    #[test]
    fn grid_shape_and_boundaries(
        initial in profile(),
        steps in 1usize..60,
        dt in 0.001_f64..2.0,
        dx in 0.01_f64..10.0,
        r in 0.01_f64..0.49,
    ) {
        let total_time = steps as f64 * dt;
        let diffusivity = r * dx * dx / dt;
        let grid = simulate(&initial, total_time, dt, dx, diffusivity).unwrap();

        prop_assert_eq!(grid.rows(), steps + 1);
        prop_assert_eq!(grid.cols(), initial.len());
        prop_assert_eq!(grid.row(0), initial.as_slice());

        let last = initial.len() - 1;
        for row in grid.iter_rows() {
            prop_assert_eq!(row[0], initial[0]);
            prop_assert_eq!(row[last], initial[last]);
        }
    }

    #[test]
    fn stable_runs_never_increase_variation_or_leave_bounds(
        initial in profile(),
        steps in 1usize..40,
        r in 0.0_f64..=0.5,
    ) {
        let diffusivity = r.max(1e-6);
        let grid = simulate(&initial, steps as f64, 1.0, 1.0, diffusivity).unwrap();

        let lo = initial.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = initial.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let slack = 1e-9 * (1.0 + hi.abs().max(lo.abs()));

        let mut prev_tv = total_variation(grid.row(0));
        for row in grid.iter_rows().skip(1) {
            let tv = total_variation(row);
            prop_assert!(tv <= prev_tv + slack, "variation grew: {} -> {}", prev_tv, tv);
            prev_tv = tv;
            for &v in row {
                prop_assert!(v >= lo - slack && v <= hi + slack);
            }
        }
    }

    #[test]
    fn ratios_above_bound_always_fail(
        initial in profile(),
        r in 0.5001_f64..1.0e4,
        dx in 0.01_f64..1.0,
    ) {
        let dt = 0.1;
        let diffusivity = r * dx * dx / dt;
        let result = simulate(&initial, 1.0, dt, dx, diffusivity);
        let is_unstable = matches!(result, Err(SimError::UnstableScheme { .. }));
        prop_assert!(is_unstable);
    }
}
