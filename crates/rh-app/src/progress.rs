use rh_sim::SimProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingScenario,
    Validating,
    BuildingInitialProfile,
    Integrating,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingScenario => "loading",
            RunStage::Validating => "validating",
            RunStage::BuildingInitialProfile => "initial-profile",
            RunStage::Integrating => "integrating",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntegrationProgress {
    pub sim_time_s: f64,
    pub t_end_s: f64,
    pub fraction_complete: f64,
    pub step: usize,
    pub total_steps: usize,
}

impl From<SimProgress> for IntegrationProgress {
    fn from(p: SimProgress) -> Self {
        Self {
            sim_time_s: p.sim_time_s,
            t_end_s: p.t_end_s,
            fraction_complete: p.fraction_complete,
            step: p.step,
            total_steps: p.total_steps,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub integration: Option<IntegrationProgress>,
}
