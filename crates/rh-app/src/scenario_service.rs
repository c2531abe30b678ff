//! Scenario loading, saving, validation, and introspection.

use std::path::Path;

use rh_project::Scenario;

use crate::error::{AppError, AppResult};

/// Summary of a scenario for listing and pre-run checks.
#[derive(Debug, Clone)]
pub struct ScenarioSummary {
    pub name: String,
    pub node_count: usize,
    pub interior_node_count: usize,
    pub steps: usize,
    pub stability_ratio: f64,
    pub stable: bool,
    /// Largest dt that would keep the scheme stable at this dx.
    pub max_stable_dt_s: f64,
}

/// Load a scenario from YAML or JSON (chosen by extension).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    rh_project::load_any(path).map_err(|source| AppError::ScenarioLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// Save a scenario; `.json` paths are written as JSON, everything else as YAML.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => rh_project::save_json(path, scenario)?,
        _ => rh_project::save_yaml(path, scenario)?,
    }
    Ok(())
}

/// Validate scenario structure.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    rh_project::validate_scenario(scenario)?;
    Ok(())
}

pub fn describe_scenario(scenario: &Scenario) -> ScenarioSummary {
    let ratio = scenario.stability_ratio();
    let interior = scenario.interior_node_count();
    ScenarioSummary {
        name: scenario.name.clone(),
        node_count: interior.saturating_add(2),
        interior_node_count: interior,
        steps: rh_sim::step_count(scenario.time.total_s, scenario.time.dt_s),
        stability_ratio: ratio,
        stable: ratio <= rh_sim::STABILITY_BOUND,
        max_stable_dt_s: rh_sim::max_stable_dt(scenario.rod.dx_m, scenario.material.diffusivity_m2_s),
    }
}
