use super::*;
use crate::Error;
use serde::Deserialize;
use serde::Serialize;

/// Lifecycle of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Completed,
    Interrupted,
    Failed,
}

/// Orchestrates runs: `idle -> running -> {completed | interrupted | failed}`,
/// with `interrupted -> running` via [`Simulation::resume`].
#[derive(Debug, Default)]
pub struct Simulation {
    phase: Phase,
    interrupt: Interrupt,
    snapshot: Option<SimulationState>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// Handle that can interrupt this simulation from anywhere.
    pub fn interrupter(&self) -> Interrupt {
        self.interrupt.clone()
    }
    /// Request a stop at the next batch boundary.
    pub fn interrupt(&self) {
        self.interrupt.interrupt();
    }
    /// State left behind by the last interruption.
    pub fn snapshot(&self) -> Option<&SimulationState> {
        self.snapshot.as_ref()
    }

    /// Validate and execute `config` from the first iteration.
    pub fn run<O: Observer>(&mut self, config: SimulationConfig, observer: &mut O) -> crate::Result<SimulationResult> {
        self.interrupt.reset();
        self.snapshot = None;
        if let Err(e) = config.validate() {
            log::warn!("rejected simulation: {}", e);
            self.phase = Phase::Failed;
            return Err(e);
        }
        self.phase = Phase::Running;
        match config.workers {
            1 => {
                log::info!(
                    "simulating {} iterations of a {}x{} game",
                    config.iterations,
                    config.strategies(),
                    config.strategies()
                );
                let run = Run::new(config)?;
                Ok(self.drive(run, observer))
            }
            _ => {
                let (result, interrupted) = parallel(&config, &self.interrupt, observer)?;
                self.phase = match interrupted {
                    true => Phase::Interrupted,
                    false => Phase::Completed,
                };
                Ok(result)
            }
        }
    }

    /// Continue the last interrupted run from its snapshot.
    pub fn resume<O: Observer>(&mut self, observer: &mut O) -> crate::Result<SimulationResult> {
        let state = self.snapshot.take().ok_or(Error::NoState)?;
        log::info!(
            "resuming at iteration {} of {}",
            state.iteration,
            state.config.iterations
        );
        self.interrupt.reset();
        self.phase = Phase::Running;
        Ok(self.drive(Run::restore(state), observer))
    }

    fn drive<O: Observer>(&mut self, mut run: Run, observer: &mut O) -> SimulationResult {
        let total = run.target() as f64;
        loop {
            if self.interrupt.is_set() {
                log::warn!(
                    "interrupted at iteration {} of {}",
                    run.iteration(),
                    run.target()
                );
                self.snapshot = Some(run.state());
                self.phase = Phase::Interrupted;
                return run.finish(true);
            }
            let report = run.batch();
            if run.is_done() {
                observer.progress(100.0, report.as_ref());
                self.phase = Phase::Completed;
                return run.finish(false);
            }
            observer.progress(run.iteration() as f64 / total * 100.0, report.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PayoffTensor;
    use crate::convergence::ConvergenceOptions;
    use crate::convergence::Report;
    use crate::rng::RngKind;
    use crate::strategy::Archetype;
    use crate::strategy::PlayerRule;

    fn config(seed: u32) -> SimulationConfig {
        SimulationConfig {
            seed,
            batch_size: 1_000,
            strategy_names: vec!["Cooperate".into(), "Defect".into()],
            ..SimulationConfig::new(
                PayoffTensor::prisoners_dilemma(),
                vec![
                    PlayerRule::Mixed {
                        probabilities: Some(vec![0.6, 0.4]),
                    },
                    PlayerRule::Behavioral {
                        archetype: Archetype::TitForTat,
                    },
                ],
                20_000,
            )
        }
    }

    #[test]
    fn identical_seeds_are_bit_identical() {
        for kind in RngKind::all() {
            let config = SimulationConfig {
                rng_kind: kind,
                ..config(12345)
            };
            let a = Simulation::new().run(config.clone(), &mut Silent).unwrap();
            let b = Simulation::new().run(config, &mut Silent).unwrap();
            assert_eq!(a.outcomes, b.outcomes);
            assert_eq!(a.strategy_frequencies, b.strategy_frequencies);
            assert_eq!(a.statistics.mean, b.statistics.mean);
            assert_eq!(a.rng_info.generator, kind);
        }
    }

    #[test]
    fn different_seeds_differ() {
        let a = Simulation::new().run(config(1), &mut Silent).unwrap();
        let b = Simulation::new().run(config(2), &mut Silent).unwrap();
        assert_ne!(a.outcomes, b.outcomes);
    }

    #[test]
    fn progress_is_monotone_and_completes() {
        let mut seen = Vec::new();
        let mut observer = |percent: f64, _: Option<&Report>| seen.push(percent);
        let result = Simulation::new().run(config(3), &mut observer).unwrap();
        assert_eq!(seen.len(), 20);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&100.0));
        assert!(seen[..19].iter().all(|p| *p < 100.0));
        assert_eq!(result.actual_iterations, 20_000);
        assert_eq!(result.outcomes.values().sum::<usize>(), 20_000);
        assert_eq!(result.strategy_frequencies.values().sum::<usize>(), 40_000);
    }

    #[test]
    fn interruption_returns_partial_results() {
        let mut simulation = Simulation::new();
        let interrupt = simulation.interrupter();
        let mut observer = |percent: f64, _: Option<&Report>| {
            if percent >= 25.0 {
                interrupt.interrupt();
            }
        };
        let result = simulation.run(config(4), &mut observer).unwrap();
        assert!(result.early_stop);
        assert!(result.actual_iterations < result.requested_iterations);
        assert_eq!(result.actual_iterations, 5_000);
        assert!(!result.statistics.is_empty());
        assert_eq!(result.statistics.variance.len(), 2);
        assert_eq!(simulation.phase(), Phase::Interrupted);
        assert!(simulation.snapshot().is_some());
    }

    #[test]
    fn resume_continues_to_the_same_result() {
        let reference = Simulation::new().run(config(5), &mut Silent).unwrap();
        let mut simulation = Simulation::new();
        let interrupt = simulation.interrupter();
        let mut stopper = |percent: f64, _: Option<&Report>| {
            if percent >= 50.0 {
                interrupt.interrupt();
            }
        };
        let partial = simulation.run(config(5), &mut stopper).unwrap();
        assert_eq!(partial.actual_iterations, 10_000);
        let mut seen = Vec::new();
        let mut observer = |percent: f64, _: Option<&Report>| seen.push(percent);
        let resumed = simulation.resume(&mut observer).unwrap();
        assert_eq!(simulation.phase(), Phase::Completed);
        assert!(seen.first().is_some_and(|p| *p > 50.0));
        assert_eq!(resumed.actual_iterations, 20_000);
        assert_eq!(resumed.outcomes, reference.outcomes);
        assert_eq!(resumed.statistics.mean, reference.statistics.mean);
        assert!(!resumed.early_stop);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut simulation = Simulation::new();
        let interrupt = simulation.interrupter();
        let mut stopper = |_: f64, _: Option<&Report>| interrupt.interrupt();
        simulation.run(config(6), &mut stopper).unwrap();
        let snapshot = simulation.snapshot().unwrap();
        let json = serde_json::to_string(snapshot).unwrap();
        let back = serde_json::from_str::<SimulationState>(&json).unwrap();
        assert_eq!(back.iteration, 1_000);
        assert_eq!(back.outcomes, snapshot.outcomes);
        assert_eq!(back.rng, snapshot.rng);
        assert_eq!(back.strategist, snapshot.strategist);
    }

    #[test]
    fn resume_without_interruption_fails() {
        let mut simulation = Simulation::new();
        assert_eq!(simulation.resume(&mut Silent).unwrap_err(), Error::NoState);
        simulation.run(config(7), &mut Silent).unwrap();
        assert_eq!(simulation.resume(&mut Silent).unwrap_err(), Error::NoState);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let mut simulation = Simulation::new();
        let mut calls = 0;
        let mut observer = |_: f64, _: Option<&Report>| calls += 1;
        let error = simulation
            .run(
                SimulationConfig {
                    player_rules: vec![PlayerRule::Pure { strategy: 0 }],
                    ..config(8)
                },
                &mut observer,
            )
            .unwrap_err();
        assert!(matches!(error, Error::Configuration(_)));
        assert_eq!(calls, 0);
        assert_eq!(simulation.phase(), Phase::Failed);
    }

    #[test]
    fn convergence_stop_reports_full_progress() {
        let mut seen = Vec::new();
        let mut observer = |percent: f64, _: Option<&Report>| seen.push(percent);
        let result = Simulation::new()
            .run(
                SimulationConfig {
                    player_rules: vec![PlayerRule::Pure { strategy: 1 }; 2],
                    convergence: Some(ConvergenceOptions::default()),
                    ..config(9)
                },
                &mut observer,
            )
            .unwrap();
        assert!(result.early_stop);
        assert!(result.early_stop_reason.is_some_and(|r| r.contains("converged")));
        assert_eq!(result.actual_iterations, 1_000);
        assert_eq!(seen, vec![100.0]);
        assert!(result.convergence_analysis.is_some_and(|c| c.converged));
    }

    #[test]
    fn parallel_runs_merge() {
        let result = Simulation::new()
            .run(
                SimulationConfig {
                    workers: 4,
                    advanced: true,
                    ..config(10)
                },
                &mut Silent,
            )
            .unwrap();
        assert_eq!(result.actual_iterations, 20_000);
        let advanced = result.advanced_results.unwrap();
        assert_eq!(advanced.workers, 4);
        assert_eq!(advanced.distributions[0].samples, 20_000);
    }
}
