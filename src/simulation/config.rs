use crate::BATCH_SIZE;
use crate::Error;
use crate::HISTORY_LIMIT;
use crate::PayoffTensor;
use crate::convergence::ConvergenceOptions;
use crate::memory::MemoryOptions;
use crate::rng::RngKind;
use crate::strategy::PlayerRule;
use serde::Deserialize;
use serde::Serialize;

/// Everything a run needs, in the external camelCase JSON layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub payoff_tensor: PayoffTensor,
    #[serde(default = "SimulationConfig::two")]
    pub player_count: usize,
    /// Display names per strategy; generated when empty.
    #[serde(default)]
    pub strategy_names: Vec<String>,
    pub player_rules: Vec<PlayerRule>,
    pub iterations: usize,
    #[serde(default = "SimulationConfig::batch")]
    pub batch_size: usize,
    #[serde(default)]
    pub rng_kind: RngKind,
    #[serde(default)]
    pub seed: u32,
    /// Convergence analysis and early stopping; off when absent.
    #[serde(default)]
    pub convergence: Option<ConvergenceOptions>,
    /// Retain bounded per-player move history.
    #[serde(default)]
    pub learning: bool,
    #[serde(default = "SimulationConfig::history")]
    pub history_limit: usize,
    /// Attach distributions, evolution series and memory statistics.
    #[serde(default)]
    pub advanced: bool,
    #[serde(default = "SimulationConfig::one")]
    pub workers: usize,
    #[serde(default)]
    pub memory: MemoryOptions,
}

impl SimulationConfig {
    pub fn new(payoff_tensor: PayoffTensor, player_rules: Vec<PlayerRule>, iterations: usize) -> Self {
        Self {
            payoff_tensor,
            player_count: Self::two(),
            strategy_names: Vec::new(),
            player_rules,
            iterations,
            batch_size: Self::batch(),
            rng_kind: RngKind::default(),
            seed: 0,
            convergence: None,
            learning: false,
            history_limit: Self::history(),
            advanced: false,
            workers: Self::one(),
            memory: MemoryOptions::default(),
        }
    }

    fn two() -> usize {
        PayoffTensor::PLAYERS
    }
    fn one() -> usize {
        1
    }
    fn batch() -> usize {
        BATCH_SIZE
    }
    fn history() -> usize {
        HISTORY_LIMIT
    }

    /// Strategies available to each player.
    pub fn strategies(&self) -> usize {
        self.payoff_tensor.rows()
    }

    /// Configured names, or `Strategy 1..n` when none were given.
    pub fn names(&self) -> Vec<String> {
        match self.strategy_names.is_empty() {
            true => (1..=self.strategies())
                .map(|i| format!("Strategy {}", i))
                .collect(),
            false => self.strategy_names.clone(),
        }
    }

    /// Reject anything that cannot run, before any iteration executes.
    pub fn validate(&self) -> crate::Result<()> {
        if self.iterations == 0 {
            return Err(Error::config("iterations must be positive"));
        }
        if self.player_count != PayoffTensor::PLAYERS {
            return Err(Error::config(format!(
                "player count {} unsupported; payoff tensors are two-player",
                self.player_count
            )));
        }
        if !self.payoff_tensor.is_square() {
            return Err(Error::config(format!(
                "payoff tensor must be square, got {}x{}",
                self.payoff_tensor.rows(),
                self.payoff_tensor.cols()
            )));
        }
        if self.player_rules.len() != self.player_count {
            return Err(Error::config(format!(
                "{} player rules supplied for {} players",
                self.player_rules.len(),
                self.player_count
            )));
        }
        if !self.strategy_names.is_empty() && self.strategy_names.len() != self.strategies() {
            return Err(Error::config(format!(
                "{} strategy names supplied for {} strategies",
                self.strategy_names.len(),
                self.strategies()
            )));
        }
        for (player, rule) in self.player_rules.iter().enumerate() {
            rule.validate(player, self.strategies())?;
        }
        if self.batch_size == 0 {
            return Err(Error::config("batch size must be positive"));
        }
        if self.workers == 0 {
            return Err(Error::config("worker count must be positive"));
        }
        if self.learning && self.history_limit == 0 {
            return Err(Error::config("history limit must be positive when learning"));
        }
        if let Some(ref convergence) = self.convergence {
            convergence.validate()?;
        }
        self.memory.validate()
    }
}
