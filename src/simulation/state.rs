use super::*;
use crate::convergence::Analyzer;
use crate::results::Aggregator;
use crate::rng::RngState;
use crate::strategy::Strategist;
use serde::Deserialize;
use serde::Serialize;
use std::collections::VecDeque;

/// Everything needed to continue an interrupted run where it stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationState {
    pub config: SimulationConfig,
    pub iteration: usize,
    /// Joint outcome counts, `[row][col]`.
    pub outcomes: Vec<Vec<usize>>,
    /// Per-player strategy counts, `[player][strategy]`.
    pub strategy_frequencies: Vec<Vec<usize>>,
    pub history: Vec<VecDeque<usize>>,
    pub rng: RngState,
    pub strategist: Strategist,
    pub aggregator: Aggregator,
    pub convergence: Option<Analyzer>,
}
