use crate::Probability;
use crate::Utility;
use serde::Deserialize;
use serde::Serialize;
use std::collections::VecDeque;

/// Per-player state carried across iterations.
///
/// Owned by the [`super::Strategist`] for the lifetime of one run. Holds
/// the bounded `(strategy, payoff)` observations used by adaptive rules and
/// the opponent history used by behavioral archetypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    capacity: usize,
    observations: VecDeque<(usize, Utility)>,
    belief: Vec<Probability>,
    last: Option<(usize, Utility)>,
    total: Utility,
    rounds: usize,
    opponent: Vec<usize>,
    opponent_last: Option<usize>,
    betrayed: bool,
}

impl Memory {
    pub fn new(strategies: usize, capacity: usize, belief: Vec<Probability>) -> Self {
        Self {
            capacity: capacity.max(1),
            observations: VecDeque::with_capacity(capacity.max(1)),
            belief,
            last: None,
            total: 0.0,
            rounds: 0,
            opponent: vec![0; strategies],
            opponent_last: None,
            betrayed: false,
        }
    }

    /// Record one iteration from this player's perspective.
    pub fn observe(&mut self, mine: usize, payoff: Utility, theirs: usize) {
        if self.observations.len() == self.capacity {
            self.observations.pop_front();
        }
        self.observations.push_back((mine, payoff));
        self.last = Some((mine, payoff));
        self.total += payoff;
        self.rounds += 1;
        if let Some(count) = self.opponent.get_mut(theirs) {
            *count += 1;
        }
        self.opponent_last = Some(theirs);
        self.betrayed |= theirs != 0;
    }

    /// Mean remembered payoff per strategy, `None` where never observed.
    pub fn fitness(&self, strategies: usize) -> Vec<Option<Utility>> {
        let mut sums = vec![(0.0, 0usize); strategies];
        for &(s, u) in self.observations.iter().filter(|(s, _)| *s < strategies) {
            sums[s].0 += u;
            sums[s].1 += 1;
        }
        sums.into_iter()
            .map(|(sum, n)| match n {
                0 => None,
                n => Some(sum / n as Utility),
            })
            .collect()
    }

    /// Running average payoff over every round played.
    pub fn average(&self) -> Utility {
        match self.rounds {
            0 => 0.0,
            n => self.total / n as Utility,
        }
    }

    pub fn belief(&self) -> &[Probability] {
        &self.belief
    }
    pub fn set_belief(&mut self, belief: Vec<Probability>) {
        self.belief = belief;
    }
    pub fn last(&self) -> Option<(usize, Utility)> {
        self.last
    }
    pub fn opponent_last(&self) -> Option<usize> {
        self.opponent_last
    }
    /// Opponent choice counts over every round played.
    pub fn opponent_counts(&self) -> &[usize] {
        &self.opponent
    }
    /// Whether the opponent has ever left strategy zero.
    pub fn betrayed(&self) -> bool {
        self.betrayed
    }
    pub fn rounds(&self) -> usize {
        self.rounds
    }
    pub fn observations(&self) -> impl Iterator<Item = &(usize, Utility)> {
        self.observations.iter()
    }
}
