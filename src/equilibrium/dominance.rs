use crate::ELIMINATION_ROUNDS;
use crate::EPSILON;
use crate::PayoffTensor;
use serde::Deserialize;
use serde::Serialize;

/// `strategy` of `player` is beaten by each of `dominated_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DominanceRecord {
    pub player: usize,
    pub strategy: usize,
    pub dominated_by: Vec<usize>,
}

/// A strategy that dominates every alternative of its player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dominant {
    pub player: usize,
    pub strategy: usize,
    pub strict: bool,
}

/// One round of iterated strict-dominance elimination, in original indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationStep {
    pub round: usize,
    /// `(player, strategy)` pairs removed this round.
    pub eliminated: Vec<(usize, usize)>,
    /// Surviving strategies per player after the round.
    pub remaining: Vec<Vec<usize>>,
    /// The game restricted to `remaining`.
    pub tensor: PayoffTensor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dominance {
    pub strictly_dominated: Vec<DominanceRecord>,
    /// Includes strictly dominated strategies.
    pub weakly_dominated: Vec<DominanceRecord>,
    pub dominant: Vec<Dominant>,
    pub elimination: Vec<EliminationStep>,
    /// Survivors of iterated elimination.
    pub remaining: Vec<Vec<usize>>,
    pub reduced: PayoffTensor,
}

impl Dominance {
    pub fn is_strictly_dominant(&self, player: usize, strategy: usize) -> bool {
        self.dominant
            .iter()
            .any(|d| d.strict && d.player == player && d.strategy == strategy)
    }
    pub fn is_strictly_dominated(&self, player: usize, strategy: usize) -> bool {
        self.strictly_dominated
            .iter()
            .any(|r| r.player == player && r.strategy == strategy)
    }
}

/// `a` beats `b` for `player` against every strategy in `opponents`.
pub fn strictly_dominates(tensor: &PayoffTensor, player: usize, a: usize, b: usize, opponents: &[usize]) -> bool {
    opponents
        .iter()
        .all(|&o| tensor.utility(player, a, o) > tensor.utility(player, b, o) + EPSILON)
}

/// `a` is never worse than `b` and sometimes better.
pub fn weakly_dominates(tensor: &PayoffTensor, player: usize, a: usize, b: usize, opponents: &[usize]) -> bool {
    let diffs = opponents
        .iter()
        .map(|&o| tensor.utility(player, a, o) - tensor.utility(player, b, o))
        .collect::<Vec<_>>();
    diffs.iter().all(|d| *d >= -EPSILON) && diffs.iter().any(|d| *d > EPSILON)
}

/// Pairwise dominance over all opponent strategies, dominant strategies,
/// and iterated elimination of strictly dominated strategies until a round
/// removes nothing or [`ELIMINATION_ROUNDS`] is reached.
pub fn analyze_dominance(tensor: &PayoffTensor) -> crate::Result<Dominance> {
    let all = (0..PayoffTensor::PLAYERS)
        .map(|p| (0..tensor.strategies(p)).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    let mut strictly_dominated = Vec::new();
    let mut weakly_dominated = Vec::new();
    let mut dominant = Vec::new();
    for player in 0..PayoffTensor::PLAYERS {
        let ref opponents = all[1 - player];
        let ref own = all[player];
        for &s in own.iter() {
            let strict = dominators(tensor, player, s, own, opponents, strictly_dominates);
            let weak = dominators(tensor, player, s, own, opponents, weakly_dominates);
            if !strict.is_empty() {
                strictly_dominated.push(DominanceRecord { player, strategy: s, dominated_by: strict });
            }
            if !weak.is_empty() {
                weakly_dominated.push(DominanceRecord { player, strategy: s, dominated_by: weak });
            }
            if own.len() < 2 {
                continue;
            }
            let others = own.iter().copied().filter(|o| *o != s).collect::<Vec<_>>();
            if others.iter().all(|&o| strictly_dominates(tensor, player, s, o, opponents)) {
                dominant.push(Dominant { player, strategy: s, strict: true });
            } else if others.iter().all(|&o| weakly_dominates(tensor, player, s, o, opponents)) {
                dominant.push(Dominant { player, strategy: s, strict: false });
            }
        }
    }
    let (elimination, remaining) = eliminate(tensor, all)?;
    let reduced = match elimination.last() {
        Some(step) => step.tensor.clone(),
        None => tensor.clone(),
    };
    Ok(Dominance {
        strictly_dominated,
        weakly_dominated,
        dominant,
        elimination,
        remaining,
        reduced,
    })
}

type Relation = fn(&PayoffTensor, usize, usize, usize, &[usize]) -> bool;

fn dominators(tensor: &PayoffTensor, player: usize, s: usize, own: &[usize], opponents: &[usize], relation: Relation) -> Vec<usize> {
    own.iter()
        .copied()
        .filter(|&a| a != s && relation(tensor, player, a, s, opponents))
        .collect()
}

/// Both players lose their dominated strategies simultaneously each round,
/// judged against the opponent's survivors at the start of the round.
fn eliminate(tensor: &PayoffTensor, mut remaining: Vec<Vec<usize>>) -> crate::Result<(Vec<EliminationStep>, Vec<Vec<usize>>)> {
    let mut steps = Vec::new();
    for round in 1..=ELIMINATION_ROUNDS {
        let eliminated = (0..PayoffTensor::PLAYERS)
            .flat_map(|player| {
                let ref own = remaining[player];
                let ref opponents = remaining[1 - player];
                own.iter()
                    .copied()
                    .filter(|&s| !dominators(tensor, player, s, own, opponents, strictly_dominates).is_empty())
                    .map(move |s| (player, s))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        if eliminated.is_empty() {
            break;
        }
        for &(player, s) in eliminated.iter() {
            remaining[player].retain(|x| *x != s);
        }
        log::debug!("elimination round {} removed {:?}", round, eliminated);
        steps.push(EliminationStep {
            round,
            tensor: tensor.restrict(&remaining[0], &remaining[1])?,
            remaining: remaining.clone(),
            eliminated,
        });
    }
    Ok((steps, remaining))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prisoners_dilemma_defection_dominates() {
        let dominance = analyze_dominance(&PayoffTensor::prisoners_dilemma()).unwrap();
        for player in 0..2 {
            assert!(dominance.is_strictly_dominant(player, 1));
            assert!(dominance.is_strictly_dominated(player, 0));
            assert!(!dominance.is_strictly_dominated(player, 1));
        }
        assert_eq!(
            dominance.strictly_dominated[0],
            DominanceRecord { player: 0, strategy: 0, dominated_by: vec![1] }
        );
        assert_eq!(dominance.elimination.len(), 1);
        assert_eq!(dominance.elimination[0].eliminated, vec![(0, 0), (1, 0)]);
        assert_eq!(dominance.remaining, vec![vec![1], vec![1]]);
        assert_eq!(dominance.reduced.cell(0, 0), &[1.0, 1.0]);
    }

    #[test]
    fn coordination_has_no_dominance() {
        let dominance = analyze_dominance(&PayoffTensor::coordination()).unwrap();
        assert!(dominance.strictly_dominated.is_empty());
        assert!(dominance.weakly_dominated.is_empty());
        assert!(dominance.dominant.is_empty());
        assert!(dominance.elimination.is_empty());
        assert_eq!(dominance.reduced, PayoffTensor::coordination());
    }

    #[test]
    fn iterated_elimination_takes_several_rounds() {
        // row 2 is strictly dominated by row 0; only then is column 1 dominated.
        let game = PayoffTensor::new(vec![
            vec![vec![4.0, 3.0], vec![5.0, 1.0]],
            vec![vec![2.0, 4.0], vec![8.0, 2.0]],
            vec![vec![3.0, 0.0], vec![4.0, 6.0]],
        ])
        .unwrap();
        let dominance = analyze_dominance(&game).unwrap();
        assert_eq!(dominance.elimination[0].eliminated, vec![(0, 2)]);
        assert_eq!(dominance.elimination[1].eliminated, vec![(1, 1)]);
        assert_eq!(dominance.elimination[2].eliminated, vec![(0, 1)]);
        assert_eq!(dominance.remaining, vec![vec![0], vec![0]]);
        assert_eq!(dominance.reduced.cell(0, 0), &[4.0, 3.0]);
    }

    #[test]
    fn weak_dominance_needs_one_strict_gain() {
        let game = PayoffTensor::new(vec![
            vec![vec![1.0, 0.0], vec![1.0, 0.0]],
            vec![vec![1.0, 0.0], vec![0.0, 0.0]],
        ])
        .unwrap();
        let dominance = analyze_dominance(&game).unwrap();
        assert!(dominance.strictly_dominated.is_empty());
        assert_eq!(dominance.weakly_dominated.len(), 1);
        assert_eq!(dominance.weakly_dominated[0].strategy, 1);
        assert!(dominance.dominant.contains(&Dominant { player: 0, strategy: 0, strict: false }));
    }

    #[test]
    fn idempotent() {
        let game = PayoffTensor::rock_paper_scissors();
        assert_eq!(analyze_dominance(&game), analyze_dominance(&game));
    }
}
