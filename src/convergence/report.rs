use super::*;
use serde::Deserialize;
use serde::Serialize;

/// What the orchestrator should do after a convergence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Continue,
    ExtendWindow,
    Stop,
}

/// One convergence check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub iteration: usize,
    pub converged: bool,
    pub confidence: f64,
    pub stable: bool,
    pub variance_stable: bool,
    pub trend_stable: bool,
    /// Main-window statistics per player.
    pub players: Vec<Summary>,
    pub tests: Vec<Battery>,
    pub action: Action,
    pub reason: Option<String>,
}

impl Report {
    /// Verdict before enough data has accumulated.
    pub fn pending(iteration: usize) -> Self {
        Self {
            iteration,
            converged: false,
            confidence: 0.0,
            stable: false,
            variance_stable: false,
            trend_stable: false,
            players: Vec::new(),
            tests: Vec::new(),
            action: Action::Continue,
            reason: None,
        }
    }
}

/// Run-level summary of every check performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvergenceAnalysis {
    pub converged: bool,
    /// First check that declared convergence.
    pub convergence_iteration: Option<usize>,
    pub final_confidence: f64,
    pub checks: usize,
    pub window: usize,
    /// `(iteration, confidence)` of recent checks.
    pub trajectory: Vec<(usize, f64)>,
    pub last: Option<Report>,
}
