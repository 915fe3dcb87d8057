use crate::CONVERGENCE_CHECK_INTERVAL;
use crate::CONVERGENCE_CONFIDENCE;
use crate::CONVERGENCE_MIN_ITERATIONS;
use crate::CONVERGENCE_TOLERANCE;
use crate::CONVERGENCE_WINDOW;
use crate::Error;
use serde::Deserialize;
use serde::Serialize;

/// Convergence analyzer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvergenceOptions {
    /// Main window capacity W.
    pub window: usize,
    pub min_iterations: usize,
    /// Hard ceiling that forces a stop recommendation.
    pub max_iterations: Option<usize>,
    pub check_interval: usize,
    pub tolerance: f64,
    pub confidence: f64,
    /// Whether a stop recommendation ends the run.
    pub early_stopping: bool,
}

impl Default for ConvergenceOptions {
    fn default() -> Self {
        Self {
            window: CONVERGENCE_WINDOW,
            min_iterations: CONVERGENCE_MIN_ITERATIONS,
            max_iterations: None,
            check_interval: CONVERGENCE_CHECK_INTERVAL,
            tolerance: CONVERGENCE_TOLERANCE,
            confidence: CONVERGENCE_CONFIDENCE,
            early_stopping: true,
        }
    }
}

impl ConvergenceOptions {
    pub fn validate(&self) -> crate::Result<()> {
        if self.window < 2 {
            return Err(Error::config("convergence window must hold at least two samples"));
        }
        if self.check_interval == 0 {
            return Err(Error::config("convergence check interval must be positive"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(Error::config("convergence tolerance must be positive"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(Error::config("convergence confidence must lie in (0, 1)"));
        }
        Ok(())
    }
}
