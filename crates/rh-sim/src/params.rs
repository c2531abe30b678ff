//! Immutable run parameters and the FTCS stability check.

use rh_core::{
    Diffusivity, Length, Time, ensure_positive, m2_per_s, meters, seconds, snapped_quotient,
};

use crate::error::{SimError, SimResult};

/// Largest stability ratio for which forward-time centered-space is stable.
pub const STABILITY_BOUND: f64 = 0.5;

/// Relative tolerance used when snapping `total_time / dt` to an integer.
pub const STEP_SNAP_REL: f64 = 1e-9;

/// Dimensionless ratio `r = diffusivity * dt / dx^2`.
#[inline]
pub fn stability_ratio(dt: f64, dx: f64, diffusivity: f64) -> f64 {
    diffusivity * dt / (dx * dx)
}

/// Largest `dt` that keeps `r` within [`STABILITY_BOUND`].
#[inline]
pub fn max_stable_dt(dx: f64, diffusivity: f64) -> f64 {
    STABILITY_BOUND * dx * dx / diffusivity
}

/// Number of time steps covering `total_time`.
///
/// Quotients within [`STEP_SNAP_REL`] of an integer snap to it; anything else
/// is floored.
pub fn step_count(total_time: f64, dt: f64) -> usize {
    snapped_quotient(total_time, dt, STEP_SNAP_REL) as usize
}

/// Scalar parameters of one integration run.
///
/// Built once per run and passed by value; values are validated by
/// [`SimulationParams::new`] and cannot be changed afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    total_time: f64,
    dt: f64,
    dx: f64,
    diffusivity: f64,
}

impl SimulationParams {
    /// Validate and build. Each value must be finite and strictly positive.
    pub fn new(total_time: f64, dt: f64, dx: f64, diffusivity: f64) -> SimResult<Self> {
        Ok(Self {
            total_time: ensure_positive(total_time, "total_time")?,
            dt: ensure_positive(dt, "dt")?,
            dx: ensure_positive(dx, "dx")?,
            diffusivity: ensure_positive(diffusivity, "diffusivity")?,
        })
    }

    /// Build from SI quantities.
    pub fn from_quantities(
        total_time: Time,
        dt: Time,
        dx: Length,
        diffusivity: Diffusivity,
    ) -> SimResult<Self> {
        Self::new(
            seconds(total_time),
            seconds(dt),
            meters(dx),
            m2_per_s(diffusivity),
        )
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn diffusivity(&self) -> f64 {
        self.diffusivity
    }

    pub fn stability_ratio(&self) -> f64 {
        stability_ratio(self.dt, self.dx, self.diffusivity)
    }

    pub fn steps(&self) -> usize {
        step_count(self.total_time, self.dt)
    }

    /// Rows in the grid this run produces (initial state included).
    ///
    /// Saturates at `usize::MAX` when the step count does not fit.
    pub fn rows(&self) -> usize {
        self.steps().saturating_add(1)
    }

    /// Fails with [`SimError::UnstableScheme`] when `r > STABILITY_BOUND`.
    pub fn check_stability(&self) -> SimResult<f64> {
        let ratio = self.stability_ratio();
        if !ratio.is_finite() {
            // dx^2 underflowing to zero, or diffusivity * dt overflowing
            let field = if self.dx * self.dx == 0.0 { "dx" } else { "diffusivity" };
            return Err(SimError::invalid(
                field,
                format!(
                    "stability ratio diffusivity * dt / dx^2 is not finite (r = {ratio}) for \
                     dt = {}, dx = {}, diffusivity = {}",
                    self.dt, self.dx, self.diffusivity
                ),
            ));
        }
        if ratio > STABILITY_BOUND {
            return Err(SimError::UnstableScheme {
                ratio,
                bound: STABILITY_BOUND,
            });
        }
        Ok(ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rh_core::{m, m2ps, s};

    #[test]
    fn rejects_each_field_by_name() {
        let cases = [
            (SimulationParams::new(0.0, 0.1, 0.1, 1.0), "total_time"),
            (SimulationParams::new(1.0, -0.1, 0.1, 1.0), "dt"),
            (SimulationParams::new(1.0, 0.1, f64::NAN, 1.0), "dx"),
            (SimulationParams::new(1.0, 0.1, 0.1, f64::INFINITY), "diffusivity"),
        ];
        for (result, expected) in cases {
            match result {
                Err(SimError::InvalidParameter { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected InvalidParameter for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn ratio_and_stability() {
        let p = SimulationParams::new(1.0, 0.5, 1.0, 0.1).unwrap();
        assert!((p.stability_ratio() - 0.05).abs() < 1e-15);
        assert!(p.check_stability().is_ok());

        let p = SimulationParams::new(1.0, 1.0, 0.1, 110.0).unwrap();
        match p.check_stability() {
            Err(SimError::UnstableScheme { ratio, bound }) => {
                assert!((ratio - 11000.0).abs() < 1e-6);
                assert_eq!(bound, STABILITY_BOUND);
            }
            other => panic!("expected UnstableScheme, got {other:?}"),
        }
    }

    #[test]
    fn ratio_exactly_at_bound_is_accepted() {
        let p = SimulationParams::new(1.0, 0.5, 1.0, 1.0).unwrap();
        assert_eq!(p.stability_ratio(), 0.5);
        assert_eq!(p.check_stability().unwrap(), 0.5);
    }

    #[test]
    fn step_count_floors_and_snaps() {
        assert_eq!(step_count(1.0, 0.5), 2);
        assert_eq!(step_count(3.0, 0.01), 300);
        assert_eq!(step_count(1.0, 0.3), 3);
        assert_eq!(step_count(0.4, 0.5), 0);
    }

    #[test]
    fn zero_steps_and_overflowing_steps() {
        let p = SimulationParams::new(0.6, 1.0, 1.0, 0.1).unwrap();
        assert_eq!(p.steps(), 0);
        assert_eq!(p.rows(), 1);

        let p = SimulationParams::new(1e300, 1e-300, 1.0, 1e-3).unwrap();
        assert_eq!(p.steps(), usize::MAX);
        assert_eq!(p.rows(), usize::MAX);
    }

    #[test]
    fn non_finite_ratio_names_the_cause() {
        let tiny_dx = SimulationParams::new(1.0, 0.1, 1e-200, 1.0).unwrap();
        let huge_product = SimulationParams::new(1e300, 1e200, 1.0, 1e200).unwrap();
        for (p, expected) in [(tiny_dx, "dx"), (huge_product, "diffusivity")] {
            match p.check_stability() {
                Err(SimError::InvalidParameter { field, reason }) => {
                    assert_eq!(field, expected);
                    assert!(reason.contains("not finite"));
                }
                other => panic!("expected InvalidParameter for {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn max_stable_dt_sits_on_the_bound() {
        let dt = max_stable_dt(0.1, 1e-3);
        assert!((stability_ratio(dt, 0.1, 1e-3) - STABILITY_BOUND).abs() < 1e-12);
    }

    #[test]
    fn from_quantities_matches_plain_values() {
        let p = SimulationParams::from_quantities(s(2.0), s(0.01), m(0.1), m2ps(1e-4)).unwrap();
        assert_eq!(p, SimulationParams::new(2.0, 0.01, 0.1, 1e-4).unwrap());
        assert_eq!(p.rows(), 201);
    }
}
