use crate::EVOLUTION_INTERVAL;
use crate::EVOLUTION_MAX_POINTS;
use crate::EVOLUTION_WINDOW;
use crate::Probability;
use crate::Utility;
use serde::Deserialize;
use serde::Serialize;
use std::collections::VecDeque;

/// One sample of a strategy's recent performance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionPoint {
    pub iteration: usize,
    /// Share of recent iterations in which the strategy was played.
    pub frequency: Probability,
    /// Mean payoff when played; zero if unplayed.
    pub average_payoff: Utility,
    /// Share of plays where the player out-earned its opponent.
    pub win_rate: Probability,
    /// Frequency in excess of uniform play.
    pub dominance: f64,
}

/// Sampled per-player, per-strategy time series.
///
/// Series never exceed [`EVOLUTION_MAX_POINTS`]: on overflow every other
/// point is dropped and the interval doubles, so a run of any length keeps
/// an evenly spaced, bounded trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evolution {
    interval: usize,
    strategies: usize,
    recent: VecDeque<(Vec<usize>, Vec<Utility>)>,
    series: Vec<Vec<Vec<EvolutionPoint>>>,
}

impl Evolution {
    pub fn new(players: usize, strategies: usize) -> Self {
        Self {
            interval: EVOLUTION_INTERVAL,
            strategies,
            recent: VecDeque::with_capacity(EVOLUTION_WINDOW),
            series: vec![vec![Vec::new(); strategies]; players],
        }
    }

    /// Feed iteration `iteration` (1-based); samples on the interval.
    pub fn record(&mut self, iteration: usize, choices: &[usize], payoffs: &[Utility]) {
        if self.recent.len() == EVOLUTION_WINDOW {
            self.recent.pop_front();
        }
        self.recent.push_back((choices.to_vec(), payoffs.to_vec()));
        if iteration % self.interval == 0 {
            self.sample(iteration);
            self.thin();
        }
    }

    /// Current iterations between samples.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// `[player][strategy]` series.
    pub fn series(&self) -> &[Vec<Vec<EvolutionPoint>>] {
        &self.series
    }
    pub fn points(&self) -> usize {
        self.series
            .first()
            .and_then(|p| p.first())
            .map_or(0, Vec::len)
    }

    /// Append another run's series, shifting its iterations by `offset`.
    pub fn absorb(&mut self, other: Evolution, offset: usize) {
        for (mine, theirs) in self.series.iter_mut().zip(other.series) {
            for (mine, theirs) in mine.iter_mut().zip(theirs) {
                mine.extend(theirs.into_iter().map(|point| EvolutionPoint {
                    iteration: point.iteration + offset,
                    ..point
                }));
            }
        }
        self.interval = self.interval.max(other.interval);
        self.thin();
    }

    fn thin(&mut self) {
        while self.points() > EVOLUTION_MAX_POINTS {
            for points in self.series.iter_mut().flatten() {
                *points = points.iter().skip(1).step_by(2).copied().collect();
            }
            self.interval *= 2;
        }
    }

    fn sample(&mut self, iteration: usize) {
        let total = self.recent.len() as f64;
        let uniform = 1.0 / self.strategies.max(1) as f64;
        for (player, series) in self.series.iter_mut().enumerate() {
            for (strategy, points) in series.iter_mut().enumerate() {
                let (plays, payoff, wins) = self
                    .recent
                    .iter()
                    .filter(|(choices, _)| choices.get(player) == Some(&strategy))
                    .fold((0usize, 0.0, 0usize), |(n, sum, wins), (_, payoffs)| {
                        let mine = payoffs[player];
                        let best_other = payoffs
                            .iter()
                            .enumerate()
                            .filter(|(p, _)| *p != player)
                            .map(|(_, u)| *u)
                            .fold(Utility::NEG_INFINITY, Utility::max);
                        (n + 1, sum + mine, wins + (mine > best_other) as usize)
                    });
                let frequency = plays as f64 / total;
                points.push(EvolutionPoint {
                    iteration,
                    frequency,
                    average_payoff: match plays {
                        0 => 0.0,
                        n => payoff / n as f64,
                    },
                    win_rate: match plays {
                        0 => 0.0,
                        n => wins as f64 / n as f64,
                    },
                    dominance: frequency - uniform,
                });
            }
        }
    }
}
