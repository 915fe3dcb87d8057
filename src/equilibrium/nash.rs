use crate::Probability;
use crate::Utility;
use serde::Deserialize;
use serde::Serialize;

/// Which solver produced an equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Pure,
    Mixed,
    Approximate,
}

/// A profile from which no player gains by deviating alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equilibrium {
    #[serde(rename = "type")]
    pub kind: Kind,
    /// One probability vector per player.
    pub strategies: Vec<Vec<Probability>>,
    /// Expected payoff per player.
    pub payoffs: Vec<Utility>,
    /// Every unilateral deviation is strictly worse.
    pub is_strict: bool,
    pub stability: Probability,
    pub confidence: Probability,
}

impl Equilibrium {
    /// Joint pure strategy, if every player puts all mass on one index.
    pub fn pure(&self) -> Option<Vec<usize>> {
        self.strategies
            .iter()
            .map(|p| p.iter().position(|x| *x == 1.0))
            .collect()
    }
}
