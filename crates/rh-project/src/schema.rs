//! Scenario schema definitions.

use rh_sim::{KernelType, SimOptions, SimResult, SimulationParams, stability_ratio};
use serde::{Deserialize, Serialize};

use crate::validate::{MAX_NODES, ValidationError};

/// One rod heating scenario: geometry, material, timing and solver choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub rod: RodDef,
    pub material: MaterialDef,
    pub time: TimeDef,
    #[serde(default)]
    pub solver: SolverDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RodDef {
    pub length_m: f64,
    pub dx_m: f64,
    pub left_temp: f64,
    pub right_temp: f64,
    /// Starting temperature of every interior node.
    #[serde(default)]
    pub initial_temp: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialDef {
    pub diffusivity_m2_s: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    pub total_s: f64,
    pub dt_s: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default)]
    pub kernel: KernelDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_steps: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KernelDef {
    #[default]
    Serial,
    Parallel,
}

impl From<KernelDef> for KernelType {
    fn from(k: KernelDef) -> Self {
        match k {
            KernelDef::Serial => KernelType::Serial,
            KernelDef::Parallel => KernelType::Parallel,
        }
    }
}

impl Scenario {
    /// Interior nodes between the two boundaries: `round(length / dx)`.
    pub fn interior_node_count(&self) -> usize {
        let n = (self.rod.length_m / self.rod.dx_m).round();
        if n.is_finite() && n > 0.0 { n as usize } else { 0 }
    }

    /// Nodes including both boundaries, at most [`MAX_NODES`].
    pub fn node_count(&self) -> Result<usize, ValidationError> {
        match self.interior_node_count().checked_add(2) {
            Some(n) if n <= MAX_NODES => Ok(n),
            _ => Err(ValidationError::invalid(
                "rod.dx_m",
                self.rod.dx_m,
                format!(
                    "rod of length {} m would need more than {MAX_NODES} nodes",
                    self.rod.length_m
                ),
            )),
        }
    }

    /// `[left] + [initial_temp] * interior + [right]`.
    pub fn initial_profile(&self) -> Result<Vec<f64>, ValidationError> {
        let nodes = self.node_count()?;
        let mut profile = Vec::with_capacity(nodes);
        profile.push(self.rod.left_temp);
        profile.extend(std::iter::repeat_n(self.rod.initial_temp, nodes - 2));
        profile.push(self.rod.right_temp);
        Ok(profile)
    }

    pub fn params(&self) -> SimResult<SimulationParams> {
        SimulationParams::new(
            self.time.total_s,
            self.time.dt_s,
            self.rod.dx_m,
            self.material.diffusivity_m2_s,
        )
    }

    pub fn sim_options(&self) -> SimOptions {
        let defaults = SimOptions::default();
        SimOptions {
            kernel: self.solver.kernel.into(),
            max_steps: self.solver.max_steps.unwrap_or(defaults.max_steps),
            ..defaults
        }
    }

    /// `diffusivity * dt / dx^2` without validating anything.
    pub fn stability_ratio(&self) -> f64 {
        stability_ratio(self.time.dt_s, self.rod.dx_m, self.material.diffusivity_m2_s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimetre_rod() -> Scenario {
        Scenario {
            version: 1,
            name: "rod".to_string(),
            rod: RodDef {
                length_m: 0.1,
                dx_m: 0.001,
                left_temp: 100.0,
                right_temp: 0.0,
                initial_temp: 0.0,
            },
            material: MaterialDef {
                diffusivity_m2_s: 1e-4,
            },
            time: TimeDef {
                total_s: 3.0,
                dt_s: 0.001,
            },
            solver: SolverDef::default(),
        }
    }

    #[test]
    fn initial_profile_has_boundaries_and_interior() {
        let s = decimetre_rod();
        assert_eq!(s.interior_node_count(), 100);
        let profile = s.initial_profile().unwrap();
        assert_eq!(profile.len(), 102);
        assert_eq!(profile[0], 100.0);
        assert_eq!(profile[101], 0.0);
        assert!(profile[1..101].iter().all(|&t| t == 0.0));
    }

    #[test]
    fn params_and_options() {
        let mut s = decimetre_rod();
        s.solver.kernel = KernelDef::Parallel;
        s.solver.max_steps = Some(10);
        let p = s.params().unwrap();
        assert_eq!(p.dx(), 0.001);
        assert!((s.stability_ratio() - 0.1).abs() < 1e-12);
        let opts = s.sim_options();
        assert_eq!(opts.kernel, KernelType::Parallel);
        assert_eq!(opts.max_steps, 10);
    }

    #[test]
    fn degenerate_geometry_has_no_interior() {
        let mut s = decimetre_rod();
        s.rod.dx_m = 0.0;
        assert_eq!(s.interior_node_count(), 0);
        s.rod.dx_m = 1.0;
        assert_eq!(s.interior_node_count(), 0);
    }

    #[test]
    fn huge_rod_has_no_profile() {
        let mut s = decimetre_rod();
        s.rod.length_m = 1e12;
        s.rod.dx_m = 1e-6;
        assert!(s.interior_node_count() > MAX_NODES);
        assert!(matches!(
            s.initial_profile(),
            Err(ValidationError::InvalidValue { .. })
        ));

        s.rod.length_m = 1e30;
        s.rod.dx_m = 1e-10;
        assert_eq!(s.interior_node_count(), usize::MAX);
        assert!(s.node_count().is_err());
    }
}
