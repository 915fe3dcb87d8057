use super::*;
use crate::EPSILON;
use crate::Error;
use crate::PayoffTensor;
use crate::Probability;
use crate::Utility;
use crate::rng::Source;
use serde::Deserialize;
use serde::Serialize;

/// Chooses a strategy for every player, every iteration.
///
/// Holds the immutable rules, sampling tables precomputed from them, and
/// the mutable per-player [`Memory`]. Every random decision draws from the
/// [`Source`] passed in by the caller; nothing here is unseeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategist {
    strategies: usize,
    rules: Vec<PlayerRule>,
    tables: Vec<Option<Vec<Probability>>>,
    memories: Vec<Memory>,
}

impl Strategist {
    pub fn new(rules: Vec<PlayerRule>, strategies: usize, rng: &mut Source) -> crate::Result<Self> {
        if strategies == 0 {
            return Err(Error::config("at least one strategy is required"));
        }
        for (player, rule) in rules.iter().enumerate() {
            rule.validate(player, strategies)?;
        }
        let tables = rules
            .iter()
            .map(|rule| match rule {
                PlayerRule::Mixed { probabilities } => Some(cumulative(
                    &probabilities
                        .as_deref()
                        .and_then(normalize)
                        .unwrap_or_else(|| uniform(strategies)),
                )),
                PlayerRule::Behavioral { archetype } => archetype
                    .shape(strategies)
                    .map(|shape| cumulative(&shape.weights(strategies, rng))),
                PlayerRule::Pure { .. } | PlayerRule::Adaptive(_) => None,
            })
            .collect();
        let memories = rules
            .iter()
            .map(|rule| match rule {
                PlayerRule::Adaptive(adaptive) => Memory::new(
                    strategies,
                    adaptive.memory_length,
                    adaptive
                        .initial_belief
                        .as_deref()
                        .and_then(normalize)
                        .unwrap_or_else(|| uniform(strategies)),
                ),
                _ => Memory::new(strategies, 1, uniform(strategies)),
            })
            .collect();
        Ok(Self {
            strategies,
            rules,
            tables,
            memories,
        })
    }

    pub fn players(&self) -> usize {
        self.rules.len()
    }
    pub fn rules(&self) -> &[PlayerRule] {
        &self.rules
    }
    pub fn memory(&self, player: usize) -> &Memory {
        &self.memories[player]
    }

    /// Strategy index for `player` this iteration.
    pub fn select_strategy(&self, player: usize, tensor: &PayoffTensor, rng: &mut Source) -> usize {
        let n = self.strategies;
        let memory = &self.memories[player];
        match &self.rules[player] {
            PlayerRule::Pure { strategy } => *strategy,
            PlayerRule::Mixed { .. } => self.sample(player, rng),
            PlayerRule::Adaptive(_) => invert(&cumulative(memory.belief()), rng.next()),
            PlayerRule::Behavioral { archetype } => match archetype {
                Archetype::TitForTat => memory.opponent_last().map_or(0, |o| o.min(n - 1)),
                Archetype::Grudger => match memory.betrayed() {
                    true => Self::defection(n),
                    false => 0,
                },
                Archetype::Pavlov => match memory.last() {
                    None => 0,
                    Some((mine, payoff)) if payoff >= memory.average() => mine,
                    Some((mine, _)) => (mine + 1) % n,
                },
                Archetype::Rational => Self::respond(player, tensor, memory.opponent_counts()),
                Archetype::Aggressive | Archetype::Cooperative | Archetype::Random => {
                    self.sample(player, rng)
                }
            },
        }
    }

    /// Feed one iteration's outcome back into every player's memory.
    pub fn observe(&mut self, choices: &[usize], payoffs: &[Utility], rng: &mut Source) {
        for player in 0..self.rules.len() {
            let theirs = choices[1 - player];
            self.memories[player].observe(choices[player], payoffs[player], theirs);
            if let PlayerRule::Adaptive(ref adaptive) = self.rules[player] {
                let belief = Self::reinforce(
                    &self.memories[player],
                    adaptive,
                    self.strategies,
                    rng,
                );
                self.memories[player].set_belief(belief);
            }
        }
    }

    fn sample(&self, player: usize, rng: &mut Source) -> usize {
        match self.tables[player] {
            Some(ref cdf) => invert(cdf, rng.next()),
            None => rng.index(self.strategies),
        }
    }

    fn defection(n: usize) -> usize {
        1.min(n - 1)
    }

    /// Best response to the opponent's empirical frequencies; uniform before any play.
    fn respond(player: usize, tensor: &PayoffTensor, counts: &[usize]) -> usize {
        let total = counts.iter().sum::<usize>();
        let n = tensor.strategies(player);
        let theirs = tensor.strategies(1 - player);
        (0..n)
            .map(|mine| {
                let value = (0..theirs)
                    .map(|t| {
                        let weight = match total {
                            0 => 1.0 / theirs as Probability,
                            _ => counts.get(t).copied().unwrap_or(0) as Probability / total as Probability,
                        };
                        weight * tensor.utility(player, mine, t)
                    })
                    .sum::<Utility>();
                (mine, value)
            })
            .fold((0, Utility::NEG_INFINITY), |best, (mine, value)| {
                if value > best.1 + EPSILON { (mine, value) } else { best }
            })
            .0
    }

    /// One step of evolutionary reinforcement.
    ///
    /// Remembered fitness is shifted to be non-negative and normalised; if it
    /// carries no signal the prior belief stands in for it.
    fn reinforce(memory: &Memory, adaptive: &Adaptive, n: usize, rng: &mut Source) -> Vec<Probability> {
        let prior = memory.belief();
        let fitness = memory.fitness(n);
        let floor = fitness
            .iter()
            .flatten()
            .copied()
            .fold(Utility::INFINITY, Utility::min);
        let shifted = fitness
            .iter()
            .map(|f| f.map_or(0.0, |u| u - floor))
            .collect::<Vec<_>>();
        let target = match shifted.iter().sum::<Utility>() > EPSILON {
            true => normalize(&shifted).unwrap_or_else(|| prior.to_vec()),
            false => prior.to_vec(),
        };
        let lambda = adaptive.learning_rate;
        let updated = prior
            .iter()
            .zip(target.iter())
            .map(|(b, f)| b * lambda + f * (1.0 - lambda) + adaptive.exploration_rate * (rng.next() - 0.5))
            .collect::<Vec<_>>();
        normalize(&updated).unwrap_or_else(|| uniform(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngKind;

    fn rng() -> Source {
        Source::new(RngKind::Mersenne, 2024)
    }
    fn behavioral(archetype: Archetype) -> PlayerRule {
        PlayerRule::Behavioral { archetype }
    }
    fn pd() -> PayoffTensor {
        PayoffTensor::prisoners_dilemma()
    }

    #[test]
    fn pure_is_fixed() {
        let ref mut rng = rng();
        let s = Strategist::new(vec![PlayerRule::Pure { strategy: 1 }; 2], 2, rng).unwrap();
        assert!((0..50).all(|_| s.select_strategy(0, &pd(), rng) == 1));
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn mixed_frequencies_follow_distribution() {
        let ref mut rng = rng();
        let rule = PlayerRule::Mixed {
            probabilities: Some(vec![0.2, 0.8]),
        };
        let s = Strategist::new(vec![rule.clone(), rule], 2, rng).unwrap();
        let ones = (0..10_000).filter(|_| s.select_strategy(0, &pd(), rng) == 1).count();
        assert!((7_700..8_300).contains(&ones), "{} of 10000", ones);
        assert_eq!(rng.draws(), 10_000);
    }

    #[test]
    fn mixed_renormalizes_and_defaults_uniform() {
        let ref mut rng = rng();
        let rules = vec![
            PlayerRule::Mixed {
                probabilities: Some(vec![3.0, 1.0]),
            },
            PlayerRule::Mixed { probabilities: None },
        ];
        let s = Strategist::new(rules, 2, rng).unwrap();
        let zeros = (0..10_000).filter(|_| s.select_strategy(0, &pd(), rng) == 0).count();
        assert!((7_200..7_800).contains(&zeros), "{} of 10000", zeros);
        let zeros = (0..10_000).filter(|_| s.select_strategy(1, &pd(), rng) == 0).count();
        assert!((4_700..5_300).contains(&zeros), "{} of 10000", zeros);
    }

    #[test]
    fn rejects_mismatched_mixed_vector() {
        let ref mut rng = rng();
        let rule = PlayerRule::Mixed {
            probabilities: Some(vec![0.5, 0.25, 0.25]),
        };
        assert!(Strategist::new(vec![rule.clone(), rule], 2, rng).is_err());
    }

    #[test]
    fn tit_for_tat_mirrors() {
        let ref mut rng = rng();
        let mut s = Strategist::new(
            vec![behavioral(Archetype::TitForTat), PlayerRule::Pure { strategy: 1 }],
            2,
            rng,
        )
        .unwrap();
        assert_eq!(s.select_strategy(0, &pd(), rng), 0);
        s.observe(&[0, 1], &[0.0, 5.0], rng);
        assert_eq!(s.select_strategy(0, &pd(), rng), 1);
        s.observe(&[1, 0], &[5.0, 0.0], rng);
        assert_eq!(s.select_strategy(0, &pd(), rng), 0);
    }

    #[test]
    fn grudger_never_forgives() {
        let ref mut rng = rng();
        let mut s = Strategist::new(vec![behavioral(Archetype::Grudger); 2], 2, rng).unwrap();
        s.observe(&[0, 0], &[3.0, 3.0], rng);
        assert_eq!(s.select_strategy(0, &pd(), rng), 0);
        s.observe(&[0, 1], &[0.0, 5.0], rng);
        for _ in 0..5 {
            assert_eq!(s.select_strategy(0, &pd(), rng), 1);
            s.observe(&[1, 0], &[5.0, 0.0], rng);
        }
    }

    #[test]
    fn pavlov_wins_stays_loses_shifts() {
        let ref mut rng = rng();
        let mut s = Strategist::new(vec![behavioral(Archetype::Pavlov); 2], 2, rng).unwrap();
        assert_eq!(s.select_strategy(0, &pd(), rng), 0);
        s.observe(&[0, 0], &[3.0, 3.0], rng);
        assert_eq!(s.select_strategy(0, &pd(), rng), 0);
        s.observe(&[0, 1], &[0.0, 5.0], rng);
        assert_eq!(s.select_strategy(0, &pd(), rng), 1);
        assert_eq!(s.select_strategy(1, &pd(), rng), 1);
    }

    #[test]
    fn rational_best_responds() {
        let ref mut rng = rng();
        let mut s = Strategist::new(vec![behavioral(Archetype::Rational); 2], 2, rng).unwrap();
        assert_eq!(s.select_strategy(0, &pd(), rng), 1);
        let coordination = PayoffTensor::coordination();
        assert_eq!(s.select_strategy(0, &coordination, rng), 0);
        for _ in 0..3 {
            s.observe(&[1, 1], &[3.0, 3.0], rng);
        }
        assert_eq!(s.select_strategy(0, &coordination, rng), 1);
    }

    #[test]
    fn archetype_skews() {
        let ref mut rng = rng();
        let s = Strategist::new(
            vec![behavioral(Archetype::Cooperative), behavioral(Archetype::Aggressive)],
            3,
            rng,
        )
        .unwrap();
        let game = PayoffTensor::rock_paper_scissors();
        let coop = (0..5_000).filter(|_| s.select_strategy(0, &game, rng) == 0).count();
        let aggr = (0..5_000).filter(|_| s.select_strategy(1, &game, rng) == 2).count();
        assert!(coop > 3_500, "{}", coop);
        assert!(aggr > 2_500, "{}", aggr);
    }

    #[test]
    fn adaptive_learns_dominant_strategy() {
        let ref mut rng = rng();
        let adaptive = PlayerRule::Adaptive(Adaptive {
            learning_rate: 0.8,
            exploration_rate: 0.01,
            memory_length: 50,
            initial_belief: None,
        });
        let game = pd();
        let mut s = Strategist::new(vec![adaptive, PlayerRule::Mixed { probabilities: None }], 2, rng).unwrap();
        for _ in 0..500 {
            let choices = [s.select_strategy(0, &game, rng), s.select_strategy(1, &game, rng)];
            let payoffs = game.cell(choices[0], choices[1]).to_vec();
            s.observe(&choices, &payoffs, rng);
        }
        let belief = s.memory(0).belief();
        assert!((belief.iter().sum::<Probability>() - 1.0).abs() < 1e-9);
        assert!(belief[1] > belief[0], "{:?}", belief);
    }

    #[test]
    fn adaptive_tolerates_flat_fitness() {
        let ref mut rng = rng();
        let adaptive = Adaptive {
            learning_rate: 0.5,
            exploration_rate: 0.0,
            memory_length: 4,
            initial_belief: Some(vec![0.3, 0.7]),
        };
        let mut s = Strategist::new(vec![PlayerRule::Adaptive(adaptive.clone()); 2], 2, rng).unwrap();
        s.observe(&[0, 0], &[0.0, 0.0], rng);
        s.observe(&[1, 1], &[0.0, 0.0], rng);
        let belief = s.memory(0).belief();
        assert!((belief[0] - 0.3).abs() < 1e-12);
        assert!((belief[1] - 0.7).abs() < 1e-12);
    }
}
