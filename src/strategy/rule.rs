use super::*;
use crate::Error;
use crate::Probability;
use serde::Deserialize;
use serde::Serialize;

/// How one player chooses a strategy every iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayerRule {
    /// Always the same strategy index.
    Pure { strategy: usize },
    /// Inverse-transform sampling from a fixed distribution; uniform if absent.
    Mixed {
        #[serde(default)]
        probabilities: Option<Vec<Probability>>,
    },
    /// Belief-updating learner.
    Adaptive(Adaptive),
    /// Named heuristic against the opponent's history.
    Behavioral { archetype: Archetype },
}

/// Evolutionary reinforcement parameters.
///
/// `belief' = belief·λ + fitness·(1-λ) + noise`, renormalised each iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adaptive {
    pub learning_rate: f64,
    pub exploration_rate: f64,
    pub memory_length: usize,
    #[serde(default)]
    pub initial_belief: Option<Vec<Probability>>,
}

impl Default for Adaptive {
    fn default() -> Self {
        Self {
            learning_rate: 0.9,
            exploration_rate: 0.05,
            memory_length: 50,
            initial_belief: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Archetype {
    /// Best response to the opponent's empirical frequencies.
    Rational,
    /// Cooperate first, then copy the opponent's last move.
    TitForTat,
    /// Cooperate until the opponent ever defects, then defect forever.
    Grudger,
    /// Win-stay, lose-shift against the running average payoff.
    Pavlov,
    /// Polarised toward the highest strategy index.
    Aggressive,
    /// Concentrated on strategy zero.
    Cooperative,
    /// Uniform.
    Random,
}

impl Archetype {
    /// Distribution generator for the archetypes that sample rather than reason.
    pub fn shape(&self, n: usize) -> Option<Shape> {
        match self {
            Self::Aggressive => Some(Shape::Polarized {
                toward: n.saturating_sub(1),
            }),
            Self::Cooperative => Some(Shape::Concentrated { focus: 0 }),
            Self::Random => Some(Shape::Uniform),
            Self::Rational | Self::TitForTat | Self::Grudger | Self::Pavlov => None,
        }
    }
}

impl PlayerRule {
    /// Reject rules that cannot be played over `n` strategies.
    pub fn validate(&self, player: usize, n: usize) -> crate::Result<()> {
        match self {
            Self::Pure { strategy } if *strategy >= n => Err(Error::config(format!(
                "player {} pure strategy {} out of range for {} strategies",
                player, strategy, n
            ))),
            Self::Mixed {
                probabilities: Some(p),
            } => Self::distribution(player, "mixed strategy", p, n),
            Self::Adaptive(adaptive) => {
                if !(0.0..=1.0).contains(&adaptive.learning_rate) {
                    return Err(Error::config(format!(
                        "player {} learning rate {} outside [0, 1]",
                        player, adaptive.learning_rate
                    )));
                }
                if !adaptive.exploration_rate.is_finite() || adaptive.exploration_rate < 0.0 {
                    return Err(Error::config(format!(
                        "player {} exploration rate must be non-negative",
                        player
                    )));
                }
                if adaptive.memory_length == 0 {
                    return Err(Error::config(format!(
                        "player {} memory length must be positive",
                        player
                    )));
                }
                match adaptive.initial_belief {
                    Some(ref belief) => Self::distribution(player, "initial belief", belief, n),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn distribution(player: usize, what: &str, p: &[Probability], n: usize) -> crate::Result<()> {
        if p.len() != n {
            return Err(Error::config(format!(
                "player {} {} has {} entries, expected {}",
                player,
                what,
                p.len(),
                n
            )));
        }
        if p.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(Error::config(format!(
                "player {} {} has negative or non-finite entries",
                player, what
            )));
        }
        if p.iter().sum::<Probability>() <= 0.0 {
            return Err(Error::config(format!(
                "player {} {} has no probability mass",
                player, what
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_rules() {
        let json = r#"[
            {"type": "pure", "strategy": 1},
            {"type": "mixed", "probabilities": [0.25, 0.75]},
            {"type": "mixed"},
            {"type": "adaptive", "learningRate": 0.8, "explorationRate": 0.1, "memoryLength": 20},
            {"type": "behavioral", "archetype": "tit-for-tat"}
        ]"#;
        let rules = serde_json::from_str::<Vec<PlayerRule>>(json).unwrap();
        assert_eq!(rules[0], PlayerRule::Pure { strategy: 1 });
        assert_eq!(rules[2], PlayerRule::Mixed { probabilities: None });
        assert!(matches!(rules[3], PlayerRule::Adaptive(Adaptive { memory_length: 20, .. })));
        assert_eq!(
            rules[4],
            PlayerRule::Behavioral {
                archetype: Archetype::TitForTat
            }
        );
    }

    #[test]
    fn validation() {
        assert!(PlayerRule::Pure { strategy: 2 }.validate(0, 2).is_err());
        assert!(PlayerRule::Pure { strategy: 1 }.validate(0, 2).is_ok());
        let short = PlayerRule::Mixed {
            probabilities: Some(vec![1.0]),
        };
        assert!(short.validate(0, 2).is_err());
        let unnormalized = PlayerRule::Mixed {
            probabilities: Some(vec![0.7, 0.4]),
        };
        assert!(unnormalized.validate(0, 2).is_ok());
        let adaptive = PlayerRule::Adaptive(Adaptive {
            learning_rate: 1.5,
            ..Adaptive::default()
        });
        assert!(adaptive.validate(0, 2).is_err());
    }
}
