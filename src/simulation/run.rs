use super::*;
use crate::JOINT_SEPARATOR;
use crate::QUALITY_SAMPLES;
use crate::convergence::Action;
use crate::convergence::Analyzer;
use crate::convergence::Report;
use crate::results::Aggregator;
use crate::rng::RngInfo;
use crate::rng::Source;
use crate::strategy::Strategist;
use std::collections::BTreeMap;
use std::collections::VecDeque;

/// Mutable context of one run: the RNG stream, strategy engine, analyzers
/// and tallies, all exclusively owned for the run's duration.
#[derive(Debug)]
pub struct Run {
    config: SimulationConfig,
    names: Vec<String>,
    target: usize,
    iteration: usize,
    rng: Source,
    strategist: Strategist,
    analyzer: Option<Analyzer>,
    aggregator: Aggregator,
    outcomes: Vec<Vec<usize>>,
    frequencies: Vec<Vec<usize>>,
    history: Vec<VecDeque<usize>>,
    stopped: Option<String>,
    latest: Option<Report>,
}

impl Run {
    pub fn new(config: SimulationConfig) -> crate::Result<Self> {
        config.validate()?;
        let rng = Source::new(config.rng_kind, config.seed);
        let target = config.iterations;
        let analyzer = config.convergence.clone().map(Analyzer::new);
        Self::build(config, rng, target, analyzer)
    }

    /// Context for one parallel worker covering `target` iterations on its own stream.
    pub fn worker(config: &SimulationConfig, worker: usize, target: usize) -> crate::Result<Self> {
        let rng = Source::fork(config.rng_kind, config.seed, worker);
        Self::build(config.clone(), rng, target, None)
    }

    fn build(
        config: SimulationConfig,
        mut rng: Source,
        target: usize,
        analyzer: Option<Analyzer>,
    ) -> crate::Result<Self> {
        let n = config.strategies();
        let players = config.player_count;
        let strategist = Strategist::new(config.player_rules.clone(), n, &mut rng)?;
        Ok(Self {
            names: config.names(),
            aggregator: Aggregator::new(players, n, config.memory.clone(), config.advanced),
            outcomes: vec![vec![0; n]; n],
            frequencies: vec![vec![0; n]; players],
            history: vec![VecDeque::new(); players],
            target,
            iteration: 0,
            rng,
            strategist,
            analyzer,
            stopped: None,
            latest: None,
            config,
        })
    }

    /// Rebuild from an interruption snapshot, continuing the identical stream.
    pub fn restore(state: SimulationState) -> Self {
        Self {
            names: state.config.names(),
            target: state.config.iterations,
            iteration: state.iteration,
            rng: Source::restore(state.rng),
            strategist: state.strategist,
            analyzer: state.convergence,
            aggregator: state.aggregator,
            outcomes: state.outcomes,
            frequencies: state.strategy_frequencies,
            history: state.history,
            stopped: None,
            latest: None,
            config: state.config,
        }
    }

    pub fn state(&self) -> SimulationState {
        SimulationState {
            config: self.config.clone(),
            iteration: self.iteration,
            outcomes: self.outcomes.clone(),
            strategy_frequencies: self.frequencies.clone(),
            history: self.history.clone(),
            rng: self.rng.snapshot(),
            strategist: self.strategist.clone(),
            aggregator: self.aggregator.clone(),
            convergence: self.analyzer.clone(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
    pub fn iteration(&self) -> usize {
        self.iteration
    }
    pub fn target(&self) -> usize {
        self.target
    }
    /// Why the run ended early on its own, if it did.
    pub fn stopped(&self) -> Option<&str> {
        self.stopped.as_deref()
    }
    pub fn is_done(&self) -> bool {
        self.iteration >= self.target || self.stopped.is_some()
    }

    /// Run up to one batch. Returns the convergence report if a check fell inside it.
    pub fn batch(&mut self) -> Option<Report> {
        let end = (self.iteration + self.config.batch_size).min(self.target);
        let mut checked = false;
        while self.iteration < end && self.stopped.is_none() {
            checked |= self.step();
        }
        log::debug!("batch complete: {} / {}", self.iteration, self.target);
        match checked {
            true => self.latest.clone(),
            false => None,
        }
    }

    /// One iteration. Returns whether a convergence check ran.
    pub fn step(&mut self) -> bool {
        let ref tensor = self.config.payoff_tensor;
        let choices = [0, 1].map(|p| self.strategist.select_strategy(p, tensor, &mut self.rng));
        let payoffs = tensor.cell(choices[0], choices[1]).to_vec();
        self.strategist.observe(&choices, &payoffs, &mut self.rng);
        self.outcomes[choices[0]][choices[1]] += 1;
        for (player, &choice) in choices.iter().enumerate() {
            self.frequencies[player][choice] += 1;
        }
        self.aggregator.push(&choices, &payoffs);
        if self.config.learning {
            for (history, &choice) in self.history.iter_mut().zip(choices.iter()) {
                if history.len() == self.config.history_limit {
                    history.pop_front();
                }
                history.push_back(choice);
            }
        }
        self.iteration += 1;
        self.converge(&payoffs)
    }

    fn converge(&mut self, payoffs: &[crate::Utility]) -> bool {
        let Some(ref mut analyzer) = self.analyzer else {
            return false;
        };
        analyzer.push(payoffs);
        if !analyzer.is_due(self.iteration) {
            return false;
        }
        let report = analyzer.check(self.iteration);
        match report.action {
            Action::Stop if analyzer.options().early_stopping => {
                let reason = report
                    .reason
                    .clone()
                    .unwrap_or_else(|| format!("converged at iteration {}", self.iteration));
                log::info!("stopping early: {}", reason);
                self.stopped = Some(reason);
            }
            Action::ExtendWindow => {
                analyzer.extend();
            }
            Action::Stop | Action::Continue => {}
        }
        self.latest = Some(report);
        true
    }

    /// Merge a later worker's tallies into this one.
    pub fn absorb(&mut self, other: Run) {
        self.iteration += other.iteration;
        self.target += other.target;
        for (mine, theirs) in self.outcomes.iter_mut().flatten().zip(other.outcomes.iter().flatten()) {
            *mine += theirs;
        }
        for (mine, theirs) in self.frequencies.iter_mut().flatten().zip(other.frequencies.iter().flatten()) {
            *mine += theirs;
        }
        for (mine, theirs) in self.history.iter_mut().zip(other.history) {
            mine.extend(theirs);
            while mine.len() > self.config.history_limit {
                mine.pop_front();
            }
        }
        self.aggregator.absorb(other.aggregator);
    }

    /// Per-player raw samples lost to chunk eviction.
    fn evicted(&self) -> Vec<usize> {
        let evicted = (0..self.config.player_count)
            .map(|player| self.aggregator.evicted(player))
            .collect::<Vec<_>>();
        if evicted.iter().any(|n| *n > 0) {
            log::warn!(
                "memory budget evicted {:?} raw samples; distributions cover the remainder",
                evicted
            );
        }
        evicted
    }

    /// Consume the context into a result. `interrupted` marks a user stop.
    pub fn finish(mut self, interrupted: bool) -> SimulationResult {
        let statistics = self.aggregator.statistics();
        let mut outcomes = BTreeMap::new();
        for (row, counts) in self.outcomes.iter().enumerate() {
            for (col, &count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
                let key = format!("{}{}{}", self.names[row], JOINT_SEPARATOR, self.names[col]);
                *outcomes.entry(key).or_insert(0) += count;
            }
        }
        let mut strategy_frequencies = BTreeMap::new();
        for (player, counts) in self.frequencies.iter().enumerate() {
            for (strategy, &count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
                let key = format!("player{}:{}", player, self.names[strategy]);
                *strategy_frequencies.entry(key).or_insert(0) += count;
            }
        }
        let advanced_results = match self.config.advanced {
            true => Some(AdvancedResults {
                evicted_samples: self.evicted(),
                distributions: self.aggregator.distributions(),
                evolution: self.aggregator.evolution().series().to_vec(),
                history: self.history.iter().map(|h| h.iter().copied().collect()).collect(),
                memory: self.aggregator.memory(),
                rng_quality: Source::new(self.config.rng_kind, self.config.seed)
                    .validate_quality(QUALITY_SAMPLES),
                workers: self.config.workers,
            }),
            false => None,
        };
        let early_stop_reason = match interrupted {
            true => Some(format!("interrupted after {} iterations", self.iteration)),
            false => self.stopped.take(),
        };
        log::info!(
            "simulation finished: {} / {} iterations",
            self.iteration,
            self.config.iterations
        );
        SimulationResult {
            actual_iterations: self.iteration,
            requested_iterations: self.config.iterations,
            outcomes,
            strategy_frequencies,
            expected_payoffs: statistics.mean.clone(),
            statistics,
            convergence_analysis: self.analyzer.as_ref().map(Analyzer::analysis),
            advanced_results,
            early_stop: early_stop_reason.is_some(),
            early_stop_reason,
            rng_info: RngInfo {
                generator: self.config.rng_kind,
                seed: self.config.seed,
            },
        }
    }
}
