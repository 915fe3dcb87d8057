use crate::Utility;
use crate::convergence::ConvergenceAnalysis;
use crate::memory::MemoryStats;
use crate::results::Distribution;
use crate::results::EvolutionPoint;
use crate::results::Session;
use crate::results::Statistics;
use crate::rng::QualityReport;
use crate::rng::RngInfo;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of a completed, stopped, or interrupted run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub actual_iterations: usize,
    pub requested_iterations: usize,
    /// Counts keyed by `"<row name> vs <col name>"`.
    pub outcomes: BTreeMap<String, usize>,
    /// Counts keyed by `"player<i>:<strategy name>"`.
    pub strategy_frequencies: BTreeMap<String, usize>,
    pub expected_payoffs: Vec<Utility>,
    pub statistics: Statistics,
    pub convergence_analysis: Option<ConvergenceAnalysis>,
    pub advanced_results: Option<AdvancedResults>,
    pub early_stop: bool,
    pub early_stop_reason: Option<String>,
    pub rng_info: RngInfo,
}

/// Optional heavyweight diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedResults {
    pub distributions: Vec<Distribution>,
    /// Raw samples per player that were evicted under the memory budget
    /// and are missing from `distributions`.
    pub evicted_samples: Vec<usize>,
    /// `[player][strategy]` sampled series.
    pub evolution: Vec<Vec<Vec<EvolutionPoint>>>,
    /// Recent moves per player, when learning is enabled.
    pub history: Vec<Vec<usize>>,
    pub memory: MemoryStats,
    pub rng_quality: QualityReport,
    pub workers: usize,
}

impl SimulationResult {
    /// Archive summary of this result under `id`.
    pub fn session(&self, id: impl Into<String>, strategies: usize) -> Session {
        Session {
            id: id.into(),
            strategies,
            iterations: self.actual_iterations,
            generator: self.rng_info.generator,
            expected_payoffs: self.expected_payoffs.clone(),
        }
    }
}
